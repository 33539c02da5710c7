//! API stub generation
//!
//! A stub keeps the public shape of a class (supertypes, fields, method
//! signatures, annotations, thrown exceptions) and replaces every executable
//! body with a raise of `UnsupportedOperationException`. Code compiled
//! against the stub links fine; running it against the stub fails loudly.

mod body;
pub mod transformer;

pub use transformer::{StubTransformer, HELPER_ACCESS_FLAGS};

use crate::classfile::ClassFile;
use crate::config::StubConfig;
use crate::error::StubError;

/// Transform one class with a fresh transformer
pub fn stub_class(class: ClassFile, config: &StubConfig) -> Result<ClassFile, StubError> {
    StubTransformer::new(config).transform(class)
}
