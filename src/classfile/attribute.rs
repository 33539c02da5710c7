//! Attributes and exception table structures for Java class files

use super::constpool::ConstantPool;
use super::defs::attribute_names;
use super::error::{ClassFormatError, ClassFormatResult, ConstPoolResult};
use super::reader::ByteReader;

/// An attribute kept as its raw payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name_index: u16,
    pub info: Vec<u8>,
}

impl AttributeInfo {
    pub fn new(name_index: u16, info: Vec<u8>) -> Self {
        Self { name_index, info }
    }

    pub fn name<'a>(&self, constant_pool: &'a ConstantPool) -> ConstPoolResult<&'a str> {
        constant_pool.utf8(self.name_index)
    }

    /// Whether this attribute's name resolves to `name`; unresolvable names never match
    pub fn is_named(&self, constant_pool: &ConstantPool, name: &str) -> bool {
        self.name(constant_pool).map(|n| n == name).unwrap_or(false)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(6 + self.info.len());
        bytes.extend_from_slice(&self.name_index.to_be_bytes());
        bytes.extend_from_slice(&(self.info.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.info);
        bytes
    }
}

/// Parsed payload of a `Code` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Vec<AttributeInfo>,
}

impl CodeAttribute {
    pub fn new(max_stack: u16, max_locals: u16, code: Vec<u8>) -> Self {
        Self {
            max_stack,
            max_locals,
            code,
            exception_table: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn parse(info: &[u8]) -> ClassFormatResult<Self> {
        let mut reader = ByteReader::new(info);
        let max_stack = reader.read_u16()?;
        let max_locals = reader.read_u16()?;
        let code_length = reader.read_u32()? as usize;
        let code = reader.read_bytes(code_length)?.to_vec();
        let table_length = reader.read_u16()?;
        let mut exception_table = Vec::with_capacity(table_length as usize);
        for _ in 0..table_length {
            exception_table.push(ExceptionTableEntry::new(
                reader.read_u16()?,
                reader.read_u16()?,
                reader.read_u16()?,
                reader.read_u16()?,
            ));
        }
        let attributes = reader.read_attributes()?;
        if reader.remaining() != 0 {
            return Err(ClassFormatError::MalformedAttribute {
                name: attribute_names::CODE,
                reason: format!("{} bytes past the nested attributes", reader.remaining()),
            });
        }
        Ok(Self { max_stack, max_locals, code, exception_table, attributes })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.max_stack.to_be_bytes());
        bytes.extend_from_slice(&self.max_locals.to_be_bytes());
        bytes.extend_from_slice(&(self.code.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.code);
        bytes.extend_from_slice(&(self.exception_table.len() as u16).to_be_bytes());
        for entry in &self.exception_table {
            bytes.extend_from_slice(&entry.to_bytes());
        }
        bytes.extend_from_slice(&(self.attributes.len() as u16).to_be_bytes());
        for attribute in &self.attributes {
            bytes.extend_from_slice(&attribute.to_bytes());
        }
        bytes
    }

    /// Wrap this payload as an attribute whose name is `name_index` (a `"Code"` Utf8 entry)
    pub fn into_attribute(self, name_index: u16) -> AttributeInfo {
        AttributeInfo::new(name_index, self.to_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

impl ExceptionTableEntry {
    pub fn new(start_pc: u16, end_pc: u16, handler_pc: u16, catch_type: u16) -> Self {
        Self { start_pc, end_pc, handler_pc, catch_type }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8);
        bytes.extend_from_slice(&self.start_pc.to_be_bytes());
        bytes.extend_from_slice(&self.end_pc.to_be_bytes());
        bytes.extend_from_slice(&self.handler_pc.to_be_bytes());
        bytes.extend_from_slice(&self.catch_type.to_be_bytes());
        bytes
    }
}

/// Class indices listed by an `Exceptions` attribute
pub fn parse_exceptions(info: &[u8]) -> ClassFormatResult<Vec<u16>> {
    let mut reader = ByteReader::new(info);
    let count = reader.read_u16()?;
    let mut classes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        classes.push(reader.read_u16()?);
    }
    if reader.remaining() != 0 {
        return Err(ClassFormatError::MalformedAttribute {
            name: attribute_names::EXCEPTIONS,
            reason: "length does not match exception count".to_string(),
        });
    }
    Ok(classes)
}

/// Utf8 index carried by a `Signature` attribute
pub fn parse_signature(info: &[u8]) -> ClassFormatResult<u16> {
    if info.len() != 2 {
        return Err(ClassFormatError::MalformedAttribute {
            name: attribute_names::SIGNATURE,
            reason: format!("expected 2 bytes, found {}", info.len()),
        });
    }
    Ok(u16::from_be_bytes([info[0], info[1]]))
}

/// Helper to build an `Exceptions` attribute
pub fn make_exceptions_attribute(constant_pool: &mut ConstantPool, classes: &[&str]) -> ConstPoolResult<AttributeInfo> {
    let name_index = constant_pool.add_utf8(attribute_names::EXCEPTIONS)?;
    let mut info = Vec::with_capacity(2 + classes.len() * 2);
    info.extend_from_slice(&(classes.len() as u16).to_be_bytes());
    for class in classes {
        info.extend_from_slice(&constant_pool.add_class(class)?.to_be_bytes());
    }
    Ok(AttributeInfo::new(name_index, info))
}

/// Helper to build a `Signature` attribute
pub fn make_signature_attribute(constant_pool: &mut ConstantPool, signature: &str) -> ConstPoolResult<AttributeInfo> {
    let name_index = constant_pool.add_utf8(attribute_names::SIGNATURE)?;
    let signature_index = constant_pool.add_utf8(signature)?;
    Ok(AttributeInfo::new(name_index, signature_index.to_be_bytes().to_vec()))
}
