//! Specific error types for classfile decoding and constant pool operations

use thiserror::Error;

/// Errors that can occur during constant pool operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstPoolError {
    #[error("Constant pool is out of space")]
    OutOfSpace,
    #[error("Invalid constant pool index: {0}")]
    InvalidIndex(u16),
    #[error("Constant pool entry {index} is not a {expected}")]
    UnexpectedType { index: u16, expected: &'static str },
    #[error("Constant pool entry {0} is not valid Unicode text")]
    NotUnicode(u16),
}

/// Errors that can occur while decoding a class file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassFormatError {
    #[error("Unexpected end of class file at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("Wrong magic: got {0:#010x}, expected 0xcafebabe")]
    InvalidMagic(u32),
    #[error("Unknown constant pool tag {tag} at offset {offset}")]
    UnknownConstantTag { tag: u8, offset: usize },
    #[error("Invalid modified UTF-8 in constant pool entry {index}")]
    InvalidUtf8 { index: u16 },
    #[error("{0} trailing bytes after class file end")]
    TrailingBytes(usize),
    #[error("Malformed {name} attribute: {reason}")]
    MalformedAttribute { name: &'static str, reason: String },
    #[error("Constant pool error: {0}")]
    ConstPool(#[from] ConstPoolError),
}

/// Errors that can occur while parsing a method descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Invalid method descriptor: {descriptor}")]
    InvalidMethodDescriptor { descriptor: String },
}

/// Result type for constant pool operations
pub type ConstPoolResult<T> = Result<T, ConstPoolError>;

/// Result type for decoding operations
pub type ClassFormatResult<T> = Result<T, ClassFormatError>;
