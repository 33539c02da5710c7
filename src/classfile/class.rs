//! Core classfile structure

use super::attribute::{parse_signature, AttributeInfo};
use super::constpool::ConstantPool;
use super::defs::{attribute_names, major_versions, MAGIC};
use super::error::{ClassFormatResult, ConstPoolResult};
use super::field::FieldInfo;
use super::flag::access_flags;
use super::method::MethodInfo;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            minor_version: 0,
            major_version: major_versions::JAVA_8,
            constant_pool: ConstantPool::new(),
            access_flags: 0,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Internal name of this class, e.g. `com/example/Greeter`
    pub fn class_name(&self) -> ConstPoolResult<&str> {
        self.constant_pool.class_name(self.this_class)
    }

    /// Internal name of the super class; `None` only for `java/lang/Object`
    pub fn super_name(&self) -> ConstPoolResult<Option<&str>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.constant_pool.class_name(self.super_class).map(Some)
    }

    pub fn interface_names(&self) -> ConstPoolResult<Vec<&str>> {
        self.interfaces.iter().map(|i| self.constant_pool.class_name(*i)).collect()
    }

    /// Generic signature from the class-level `Signature` attribute
    pub fn signature(&self) -> ClassFormatResult<Option<&str>> {
        match self.attributes.iter().find(|a| a.is_named(&self.constant_pool, attribute_names::SIGNATURE)) {
            Some(attribute) => Ok(Some(self.constant_pool.utf8(parse_signature(&attribute.info)?)?)),
            None => Ok(None),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & access_flags::ACC_INTERFACE != 0
    }

    /// A `module-info` descriptor; it declares no methods and has no super class
    pub fn is_module(&self) -> bool {
        self.access_flags & access_flags::ACC_MODULE != 0
    }

    /// Find a method by name and descriptor
    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| {
            m.name(&self.constant_pool).map(|n| n == name).unwrap_or(false)
                && m.descriptor(&self.constant_pool).map(|d| d == descriptor).unwrap_or(false)
        })
    }
}

impl Default for ClassFile {
    fn default() -> Self {
        Self::new()
    }
}
