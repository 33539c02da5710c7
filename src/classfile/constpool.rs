//! Constant pool and constants for Java class files

use super::error::{ConstPoolError, ConstPoolResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    /// Utf8 entry whose bytes are well-formed but not valid Unicode, such as a
    /// string literal holding an unpaired surrogate; kept as read
    Utf8Raw(Vec<u8>),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
    NameAndType(u16, u16),
    MethodHandle(u8, u16),
    MethodType(u16),
    Dynamic(u16, u16),
    InvokeDynamic(u16, u16),
    Module(u16),
    Package(u16),
    /// Second slot taken by a `Long` or `Double`; never written
    Unusable,
}

pub(crate) mod constant_tags {
    pub const CONSTANT_UTF8: u8 = 1;
    pub const CONSTANT_INTEGER: u8 = 3;
    pub const CONSTANT_FLOAT: u8 = 4;
    pub const CONSTANT_LONG: u8 = 5;
    pub const CONSTANT_DOUBLE: u8 = 6;
    pub const CONSTANT_CLASS: u8 = 7;
    pub const CONSTANT_STRING: u8 = 8;
    pub const CONSTANT_FIELDREF: u8 = 9;
    pub const CONSTANT_METHODREF: u8 = 10;
    pub const CONSTANT_INTERFACEMETHODREF: u8 = 11;
    pub const CONSTANT_NAMEANDTYPE: u8 = 12;
    pub const CONSTANT_METHODHANDLE: u8 = 15;
    pub const CONSTANT_METHODTYPE: u8 = 16;
    pub const CONSTANT_DYNAMIC: u8 = 17;
    pub const CONSTANT_INVOKEDYNAMIC: u8 = 18;
    pub const CONSTANT_MODULE: u8 = 19;
    pub const CONSTANT_PACKAGE: u8 = 20;
}

impl Constant {
    /// Whether this constant occupies two pool slots
    pub fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }

    pub fn tag(&self) -> Option<u8> {
        use constant_tags::*;
        let tag = match self {
            Constant::Utf8(_) | Constant::Utf8Raw(_) => CONSTANT_UTF8,
            Constant::Integer(_) => CONSTANT_INTEGER,
            Constant::Float(_) => CONSTANT_FLOAT,
            Constant::Long(_) => CONSTANT_LONG,
            Constant::Double(_) => CONSTANT_DOUBLE,
            Constant::Class(_) => CONSTANT_CLASS,
            Constant::String(_) => CONSTANT_STRING,
            Constant::FieldRef(..) => CONSTANT_FIELDREF,
            Constant::MethodRef(..) => CONSTANT_METHODREF,
            Constant::InterfaceMethodRef(..) => CONSTANT_INTERFACEMETHODREF,
            Constant::NameAndType(..) => CONSTANT_NAMEANDTYPE,
            Constant::MethodHandle(..) => CONSTANT_METHODHANDLE,
            Constant::MethodType(_) => CONSTANT_METHODTYPE,
            Constant::Dynamic(..) => CONSTANT_DYNAMIC,
            Constant::InvokeDynamic(..) => CONSTANT_INVOKEDYNAMIC,
            Constant::Module(_) => CONSTANT_MODULE,
            Constant::Package(_) => CONSTANT_PACKAGE,
            Constant::Unusable => return None,
        };
        Some(tag)
    }
}

/// The constant pool of one class. Slot `i` of `constants` is pool index `i + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    pub(crate) constants: Vec<Constant>,
}

impl ConstantPool {
    /// Largest slot count representable by the u16 `constant_pool_count` (count is slots + 1)
    pub const MAX_SLOTS: usize = u16::MAX as usize - 1;

    pub fn new() -> Self {
        Self { constants: Vec::new() }
    }

    /// Number of occupied slots, including the second half of wide entries
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<&Constant> {
        if index == 0 {
            return None;
        }
        self.constants.get(index as usize - 1)
    }

    /// Iterate `(index, constant)` pairs, skipping the unusable halves of wide entries
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.constants
            .iter()
            .enumerate()
            .filter(|(_, c)| !matches!(c, Constant::Unusable))
            .map(|(i, c)| ((i + 1) as u16, c))
    }

    /// Append a constant without looking for an equal one
    pub fn push(&mut self, constant: Constant) -> ConstPoolResult<u16> {
        let needed = if constant.is_wide() { 2 } else { 1 };
        if self.constants.len() + needed > Self::MAX_SLOTS {
            return Err(ConstPoolError::OutOfSpace);
        }
        let wide = constant.is_wide();
        self.constants.push(constant);
        let index = self.constants.len() as u16;
        if wide {
            self.constants.push(Constant::Unusable);
        }
        Ok(index)
    }

    pub fn utf8(&self, index: u16) -> ConstPoolResult<&str> {
        match self.get(index) {
            Some(Constant::Utf8(value)) => Ok(value.as_str()),
            Some(Constant::Utf8Raw(_)) => Err(ConstPoolError::NotUnicode(index)),
            Some(_) => Err(ConstPoolError::UnexpectedType { index, expected: "Utf8" }),
            None => Err(ConstPoolError::InvalidIndex(index)),
        }
    }

    /// Resolve a `Class` entry to its internal name
    pub fn class_name(&self, index: u16) -> ConstPoolResult<&str> {
        match self.get(index) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index),
            Some(_) => Err(ConstPoolError::UnexpectedType { index, expected: "Class" }),
            None => Err(ConstPoolError::InvalidIndex(index)),
        }
    }

    /// Resolve a `NameAndType` entry to `(name, descriptor)`
    pub fn name_and_type(&self, index: u16) -> ConstPoolResult<(&str, &str)> {
        match self.get(index) {
            Some(Constant::NameAndType(name, descriptor)) => Ok((self.utf8(*name)?, self.utf8(*descriptor)?)),
            Some(_) => Err(ConstPoolError::UnexpectedType { index, expected: "NameAndType" }),
            None => Err(ConstPoolError::InvalidIndex(index)),
        }
    }

    /// Resolve a `Methodref` entry to `(owner, name, descriptor)`
    pub fn method_ref(&self, index: u16) -> ConstPoolResult<(&str, &str, &str)> {
        match self.get(index) {
            Some(Constant::MethodRef(class, nat)) => {
                let owner = self.class_name(*class)?;
                let (name, descriptor) = self.name_and_type(*nat)?;
                Ok((owner, name, descriptor))
            }
            Some(_) => Err(ConstPoolError::UnexpectedType { index, expected: "Methodref" }),
            None => Err(ConstPoolError::InvalidIndex(index)),
        }
    }

    /// Resolve a `String` entry to its value
    pub fn string(&self, index: u16) -> ConstPoolResult<&str> {
        match self.get(index) {
            Some(Constant::String(utf8)) => self.utf8(*utf8),
            Some(_) => Err(ConstPoolError::UnexpectedType { index, expected: "String" }),
            None => Err(ConstPoolError::InvalidIndex(index)),
        }
    }

    pub fn find_utf8(&self, value: &str) -> Option<u16> {
        self.iter()
            .find(|(_, c)| matches!(c, Constant::Utf8(v) if v == value))
            .map(|(i, _)| i)
    }

    pub fn find_class(&self, name: &str) -> Option<u16> {
        let name_index = self.find_utf8(name)?;
        self.find(|c| matches!(c, Constant::Class(n) if *n == name_index))
    }

    pub fn find_string(&self, value: &str) -> Option<u16> {
        let utf8_index = self.find_utf8(value)?;
        self.find(|c| matches!(c, Constant::String(u) if *u == utf8_index))
    }

    pub fn find_name_and_type(&self, name: &str, descriptor: &str) -> Option<u16> {
        let name_index = self.find_utf8(name)?;
        let descriptor_index = self.find_utf8(descriptor)?;
        self.find(|c| matches!(c, Constant::NameAndType(n, d) if *n == name_index && *d == descriptor_index))
    }

    pub fn find_method_ref(&self, class: &str, name: &str, descriptor: &str) -> Option<u16> {
        let class_index = self.find_class(class)?;
        let name_and_type_index = self.find_name_and_type(name, descriptor)?;
        self.find(|c| matches!(c, Constant::MethodRef(k, nt) if *k == class_index && *nt == name_and_type_index))
    }

    fn find<F: Fn(&Constant) -> bool>(&self, accept: F) -> Option<u16> {
        self.iter().find(|(_, c)| accept(c)).map(|(i, _)| i)
    }

    pub fn add_utf8(&mut self, value: &str) -> ConstPoolResult<u16> {
        match self.find_utf8(value) {
            Some(index) => Ok(index),
            None => self.push(Constant::Utf8(value.to_string())),
        }
    }

    pub fn add_class(&mut self, name: &str) -> ConstPoolResult<u16> {
        if let Some(index) = self.find_class(name) {
            return Ok(index);
        }
        let name_index = self.add_utf8(name)?;
        self.push(Constant::Class(name_index))
    }

    pub fn add_string(&mut self, value: &str) -> ConstPoolResult<u16> {
        if let Some(index) = self.find_string(value) {
            return Ok(index);
        }
        let utf8_index = self.add_utf8(value)?;
        self.push(Constant::String(utf8_index))
    }

    pub fn add_name_and_type(&mut self, name: &str, descriptor: &str) -> ConstPoolResult<u16> {
        if let Some(index) = self.find_name_and_type(name, descriptor) {
            return Ok(index);
        }
        let name_index = self.add_utf8(name)?;
        let descriptor_index = self.add_utf8(descriptor)?;
        self.push(Constant::NameAndType(name_index, descriptor_index))
    }

    pub fn add_method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> ConstPoolResult<u16> {
        if let Some(index) = self.find_method_ref(class, name, descriptor) {
            return Ok(index);
        }
        let class_index = self.add_class(class)?;
        let name_and_type_index = self.add_name_and_type(name, descriptor)?;
        self.push(Constant::MethodRef(class_index, name_and_type_index))
    }
}
