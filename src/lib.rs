//! API stub generator for compiled JVM classes
//!
//! Turns a class file into an "API stub": every declaration a compiler needs
//! is kept, and every method body is replaced with a throw of
//! `UnsupportedOperationException`. Code compiles against a stub but fails
//! fast, with a fixed diagnostic, if the stub ends up on a runtime classpath.
//!
//! ## Architecture
//!
//! - **classfile**: decoding, in-memory model and encoding of `.class` files
//! - **stub**: the body-replacing transform
//! - **verify**: structural checks run over every stub before encoding
//! - **tree**: parallel stubbing of a directory of classes
//! - **bin**: command-line interface
//!
//! ## Flow
//!
//! ```text
//! .class bytes → ClassReader → ClassFile → StubTransformer → verify → bytes
//! ```

pub mod classfile;
pub mod config;
pub mod consts;
pub mod error;
pub mod stub;
pub mod tree;
pub mod verify;

pub use classfile::ClassFile;
pub use config::{InitializerPolicy, StubConfig};
pub use error::{Error, Result, StubError};
pub use stub::{stub_class, StubTransformer};
pub use tree::{stub_tree, TreeReport};

/// Stub one class given as bytes and return the stub's bytes
///
/// Decode → transform → verify (when `config.verify` is set) → encode.
pub fn stub_bytes(bytes: &[u8], config: &StubConfig) -> Result<Vec<u8>> {
    let class = classfile::read_class(bytes)?;
    let stub = stub::stub_class(class, config)?;
    if config.verify {
        verify::verify(&stub)?;
    }
    Ok(classfile::class_file_to_bytes(&stub))
}
