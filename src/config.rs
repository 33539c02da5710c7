//! Stub generation settings

/// What to do with a class's static initializer (`<clinit>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializerPolicy {
    /// Replace the body like any other method; class initialization then fails
    #[default]
    Stub,
    /// Replace the body with a bare `return`, so static methods raise the
    /// diagnostic exception themselves instead of `ExceptionInInitializerError`
    Empty,
}

#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Run the structural verifier on every stub before encoding it
    pub verify: bool,
    pub initializer_policy: InitializerPolicy,
    /// Worker threads for directory stubbing; `None` uses the rayon default
    pub threads: Option<usize>,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            verify: true,
            initializer_policy: InitializerPolicy::Stub,
            threads: None,
        }
    }
}

impl StubConfig {
    pub fn with_initializer_policy(mut self, policy: InitializerPolicy) -> Self {
        self.initializer_policy = policy;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}
