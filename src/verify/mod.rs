//! Structural checks over a stubbed ClassFile
//!
//! Runs before a stub is encoded so that a malformed stub is reported for
//! its class instead of surfacing later as a `VerifyError` in a JVM.

mod verifier;
pub mod class_access_flags;
pub mod constant_pool;
pub mod fields;
pub mod interfaces;
pub mod method_access_flags;
pub mod methods;

pub use verifier::{verify, VerifyError, VerifyResult};
