//! MethodInfo structure and serialization

use super::attribute::{parse_exceptions, parse_signature, AttributeInfo, CodeAttribute};
use super::constpool::ConstantPool;
use super::defs::attribute_names;
use super::error::{ClassFormatResult, ConstPoolResult};
use super::flag::access_flags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl MethodInfo {
    pub fn new(access_flags: u16, name_index: u16, descriptor_index: u16) -> Self {
        Self { access_flags, name_index, descriptor_index, attributes: Vec::new() }
    }

    pub fn name<'a>(&self, constant_pool: &'a ConstantPool) -> ConstPoolResult<&'a str> {
        constant_pool.utf8(self.name_index)
    }

    pub fn descriptor<'a>(&self, constant_pool: &'a ConstantPool) -> ConstPoolResult<&'a str> {
        constant_pool.utf8(self.descriptor_index)
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & access_flags::ACC_ABSTRACT != 0
    }

    pub fn is_native(&self) -> bool {
        self.access_flags & access_flags::ACC_NATIVE != 0
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & access_flags::ACC_STATIC != 0
    }

    /// Position of the `Code` attribute in `attributes`, if any
    pub fn code_position(&self, constant_pool: &ConstantPool) -> Option<usize> {
        self.attributes.iter().position(|a| a.is_named(constant_pool, attribute_names::CODE))
    }

    /// A method has a body when it is neither abstract nor native and carries a `Code` attribute
    pub fn has_body(&self, constant_pool: &ConstantPool) -> bool {
        !self.is_abstract() && !self.is_native() && self.code_position(constant_pool).is_some()
    }

    pub fn code(&self, constant_pool: &ConstantPool) -> ClassFormatResult<Option<CodeAttribute>> {
        match self.code_position(constant_pool) {
            Some(pos) => Ok(Some(CodeAttribute::parse(&self.attributes[pos].info)?)),
            None => Ok(None),
        }
    }

    /// Swap the `Code` attribute for `code`, keeping its position and name entry.
    /// Returns `false` when the method has no `Code` attribute to replace.
    pub fn replace_code(&mut self, constant_pool: &ConstantPool, code: CodeAttribute) -> bool {
        match self.code_position(constant_pool) {
            Some(pos) => {
                let name_index = self.attributes[pos].name_index;
                self.attributes[pos] = code.into_attribute(name_index);
                true
            }
            None => false,
        }
    }

    /// Internal names of the declared checked exceptions
    pub fn exceptions<'a>(&self, constant_pool: &'a ConstantPool) -> ClassFormatResult<Vec<&'a str>> {
        let mut names = Vec::new();
        for attribute in self.attributes.iter().filter(|a| a.is_named(constant_pool, attribute_names::EXCEPTIONS)) {
            for index in parse_exceptions(&attribute.info)? {
                names.push(constant_pool.class_name(index)?);
            }
        }
        Ok(names)
    }

    pub fn signature<'a>(&self, constant_pool: &'a ConstantPool) -> ClassFormatResult<Option<&'a str>> {
        match self.attributes.iter().find(|a| a.is_named(constant_pool, attribute_names::SIGNATURE)) {
            Some(attribute) => Ok(Some(constant_pool.utf8(parse_signature(&attribute.info)?)?)),
            None => Ok(None),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.access_flags.to_be_bytes());
        bytes.extend_from_slice(&self.name_index.to_be_bytes());
        bytes.extend_from_slice(&self.descriptor_index.to_be_bytes());
        bytes.extend_from_slice(&(self.attributes.len() as u16).to_be_bytes());
        for attribute in &self.attributes { bytes.extend_from_slice(&attribute.to_bytes()); }
        bytes
    }
}
