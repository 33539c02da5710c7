//! In-memory JVM class file structures
//!
//! This module decodes `.class` bytes into [`ClassFile`], lets callers edit
//! members in place, and encodes the result back. Attributes the stub
//! transform does not touch are carried as raw payloads so they round-trip
//! byte for byte.

pub mod attribute;
pub mod class;
pub mod code;
pub mod constpool;
pub mod defs;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod flag;
pub mod method;
pub mod mutf8;
pub mod opcodes;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use attribute::{AttributeInfo, CodeAttribute, ExceptionTableEntry};
pub use class::ClassFile;
pub use code::Code;
pub use constpool::{Constant, ConstantPool};
pub use error::{ClassFormatError, ConstPoolError, DescriptorError};
pub use field::FieldInfo;
pub use flag::access_flags;
pub use method::MethodInfo;
pub use reader::ClassReader;
pub use writer::ClassfileWritable;

/// Decode class file bytes
pub fn read_class(bytes: &[u8]) -> Result<ClassFile, ClassFormatError> {
    ClassReader::read(bytes)
}

/// Encode a class file to bytes
pub fn class_file_to_bytes(class_file: &ClassFile) -> Vec<u8> {
    class_file.to_classfile_bytes()
}
