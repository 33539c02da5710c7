use std::path::PathBuf;
use thiserror::Error;

use crate::classfile::{ClassFormatError, ConstPoolError, DescriptorError};
use crate::verify::VerifyError;

/// Result type for apistub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while stubbing a single class
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StubError {
    #[error("Class '{class}' already declares {name}{descriptor}")]
    HelperNameCollision {
        class: String,
        name: &'static str,
        descriptor: &'static str,
    },

    #[error("Constant pool error: {0}")]
    ConstPool(#[from] ConstPoolError),

    #[error("Class format error: {0}")]
    Format(#[from] ClassFormatError),

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),
}

/// Error types for the apistub crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode class: {0}")]
    Decode(#[from] ClassFormatError),

    #[error("Stub transform failed: {0}")]
    Stub(#[from] StubError),

    #[error("Stub verification failed: {0}")]
    Verify(#[from] VerifyError),

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Attach the file a per-class error came from
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into(), source: Box::new(self) }
    }
}
