//! Trait-based serialization for classfile structures

use std::io::Write;
use super::class::ClassFile;
use super::constpool::{Constant, ConstantPool};
use super::mutf8;

/// An object which can be written into a classfile.
/// This trait provides a unified interface for serializing all classfile components.
pub trait ClassfileWritable {
    /// Writes the bytes of this object into the given buffer.
    ///
    /// # Arguments
    ///
    /// * `buffer` - classfile byte-buffer into which this object should be written
    fn write_to_classfile<W: Write>(&self, buffer: &mut W) -> std::io::Result<()>;

    /// Writes the bytes of this object into a newly created buffer.
    fn to_classfile_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to_classfile(&mut buffer);
        buffer
    }
}

impl ClassfileWritable for ClassFile {
    fn write_to_classfile<W: Write>(&self, buffer: &mut W) -> std::io::Result<()> {
        buffer.write_all(&self.magic.to_be_bytes())?;

        buffer.write_all(&self.minor_version.to_be_bytes())?;
        buffer.write_all(&self.major_version.to_be_bytes())?;

        self.constant_pool.write_to_classfile(buffer)?;

        buffer.write_all(&self.access_flags.to_be_bytes())?;

        buffer.write_all(&self.this_class.to_be_bytes())?;
        buffer.write_all(&self.super_class.to_be_bytes())?;

        buffer.write_all(&(self.interfaces.len() as u16).to_be_bytes())?;
        for interface in &self.interfaces {
            buffer.write_all(&interface.to_be_bytes())?;
        }

        buffer.write_all(&(self.fields.len() as u16).to_be_bytes())?;
        for field in &self.fields {
            buffer.write_all(&field.to_bytes())?;
        }

        buffer.write_all(&(self.methods.len() as u16).to_be_bytes())?;
        for method in &self.methods {
            buffer.write_all(&method.to_bytes())?;
        }

        buffer.write_all(&(self.attributes.len() as u16).to_be_bytes())?;
        for attribute in &self.attributes {
            buffer.write_all(&attribute.to_bytes())?;
        }
        Ok(())
    }
}

impl ClassfileWritable for ConstantPool {
    fn write_to_classfile<W: Write>(&self, buffer: &mut W) -> std::io::Result<()> {
        // Write constant pool count (size + 1)
        let count = (self.constants.len() + 1) as u16;
        buffer.write_all(&count.to_be_bytes())?;

        for constant in &self.constants {
            constant.write_to_classfile(buffer)?;
        }
        Ok(())
    }
}

impl ClassfileWritable for Constant {
    fn write_to_classfile<W: Write>(&self, buffer: &mut W) -> std::io::Result<()> {
        use Constant::*;

        if let Some(tag) = self.tag() {
            buffer.write_all(&[tag])?;
        }
        match self {
            Utf8(value) => {
                let utf8_bytes = mutf8::encode(value);
                buffer.write_all(&(utf8_bytes.len() as u16).to_be_bytes())?;
                buffer.write_all(&utf8_bytes)?;
            }
            Utf8Raw(bytes) => {
                buffer.write_all(&(bytes.len() as u16).to_be_bytes())?;
                buffer.write_all(bytes)?;
            }
            Integer(value) => buffer.write_all(&value.to_be_bytes())?,
            Float(value) => buffer.write_all(&value.to_bits().to_be_bytes())?,
            Long(value) => buffer.write_all(&value.to_be_bytes())?,
            Double(value) => buffer.write_all(&value.to_bits().to_be_bytes())?,
            Class(index) | String(index) | MethodType(index) | Module(index) | Package(index) => {
                buffer.write_all(&index.to_be_bytes())?;
            }
            FieldRef(first, second)
            | MethodRef(first, second)
            | InterfaceMethodRef(first, second)
            | NameAndType(first, second)
            | Dynamic(first, second)
            | InvokeDynamic(first, second) => {
                buffer.write_all(&first.to_be_bytes())?;
                buffer.write_all(&second.to_be_bytes())?;
            }
            MethodHandle(reference_kind, reference_index) => {
                buffer.write_all(&[*reference_kind])?;
                buffer.write_all(&reference_index.to_be_bytes())?;
            }
            Unusable => {}
        }
        Ok(())
    }
}
