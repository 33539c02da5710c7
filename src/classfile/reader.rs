//! Decoding of class file bytes into [`ClassFile`]
//!
//! Attributes are kept as raw payloads; only `Code` is parsed, and only on
//! demand through [`CodeAttribute::parse`](super::attribute::CodeAttribute::parse).

use super::attribute::AttributeInfo;
use super::class::ClassFile;
use super::constpool::{constant_tags::*, Constant, ConstantPool};
use super::defs::MAGIC;
use super::error::{ClassFormatError, ClassFormatResult, ConstPoolError};
use super::field::FieldInfo;
use super::method::MethodInfo;
use super::mutf8;

/// Big-endian cursor over a byte slice
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> ClassFormatResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(ClassFormatError::UnexpectedEof { offset: self.bytes.len() });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> ClassFormatResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_u8(&mut self) -> ClassFormatResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub(crate) fn read_u16(&mut self) -> ClassFormatResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub(crate) fn read_u32(&mut self) -> ClassFormatResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a `u16` count followed by that many attributes
    pub(crate) fn read_attributes(&mut self) -> ClassFormatResult<Vec<AttributeInfo>> {
        let count = self.read_u16()?;
        let mut attributes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name_index = self.read_u16()?;
            let length = self.read_u32()? as usize;
            let info = self.read_bytes(length)?.to_vec();
            attributes.push(AttributeInfo::new(name_index, info));
        }
        Ok(attributes)
    }
}

/// Reads a class file into its in-memory structure
pub struct ClassReader;

impl ClassReader {
    pub fn read(bytes: &[u8]) -> ClassFormatResult<ClassFile> {
        let mut reader = ByteReader::new(bytes);

        let magic = reader.read_u32()?;
        if magic != MAGIC {
            return Err(ClassFormatError::InvalidMagic(magic));
        }
        let minor_version = reader.read_u16()?;
        let major_version = reader.read_u16()?;

        let constant_pool = read_constant_pool(&mut reader)?;

        let access_flags = reader.read_u16()?;
        let this_class = reader.read_u16()?;
        constant_pool.class_name(this_class)?;
        let super_class = reader.read_u16()?;
        if super_class != 0 {
            constant_pool.class_name(super_class)?;
        }

        let interfaces_count = reader.read_u16()?;
        let mut interfaces = Vec::with_capacity(interfaces_count as usize);
        for _ in 0..interfaces_count {
            let index = reader.read_u16()?;
            constant_pool.class_name(index)?;
            interfaces.push(index);
        }

        let fields_count = reader.read_u16()?;
        let mut fields = Vec::with_capacity(fields_count as usize);
        for _ in 0..fields_count {
            let (access_flags, name_index, descriptor_index) = read_member_header(&mut reader, &constant_pool)?;
            let mut field = FieldInfo::new(access_flags, name_index, descriptor_index);
            field.attributes = reader.read_attributes()?;
            fields.push(field);
        }

        let methods_count = reader.read_u16()?;
        let mut methods = Vec::with_capacity(methods_count as usize);
        for _ in 0..methods_count {
            let (access_flags, name_index, descriptor_index) = read_member_header(&mut reader, &constant_pool)?;
            let mut method = MethodInfo::new(access_flags, name_index, descriptor_index);
            method.attributes = reader.read_attributes()?;
            methods.push(method);
        }

        let attributes = reader.read_attributes()?;

        if reader.remaining() != 0 {
            return Err(ClassFormatError::TrailingBytes(reader.remaining()));
        }

        log::trace!(
            "decoded class {} (v{}.{}): {} constants, {} fields, {} methods",
            constant_pool.class_name(this_class)?,
            major_version,
            minor_version,
            constant_pool.len(),
            fields.len(),
            methods.len()
        );

        Ok(ClassFile {
            magic,
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }
}

fn read_member_header(reader: &mut ByteReader, pool: &ConstantPool) -> ClassFormatResult<(u16, u16, u16)> {
    let access_flags = reader.read_u16()?;
    let name_index = reader.read_u16()?;
    pool.utf8(name_index)?;
    let descriptor_index = reader.read_u16()?;
    pool.utf8(descriptor_index)?;
    Ok((access_flags, name_index, descriptor_index))
}

fn read_constant_pool(reader: &mut ByteReader) -> ClassFormatResult<ConstantPool> {
    let count = reader.read_u16()?;
    let mut pool = ConstantPool::new();
    // Valid indices run from 1 to count - 1
    while pool.len() + 1 < count as usize {
        let offset = reader.offset();
        let tag = reader.read_u8()?;
        let constant = match tag {
            CONSTANT_UTF8 => {
                let length = reader.read_u16()? as usize;
                let bytes = reader.read_bytes(length)?;
                let index = (pool.len() + 1) as u16;
                match mutf8::decode(bytes) {
                    Some(value) => Constant::Utf8(value),
                    None if mutf8::is_well_formed(bytes) => Constant::Utf8Raw(bytes.to_vec()),
                    None => return Err(ClassFormatError::InvalidUtf8 { index }),
                }
            }
            CONSTANT_INTEGER => Constant::Integer(reader.read_u32()? as i32),
            CONSTANT_FLOAT => Constant::Float(f32::from_bits(reader.read_u32()?)),
            CONSTANT_LONG => {
                let high = reader.read_u32()? as u64;
                let low = reader.read_u32()? as u64;
                Constant::Long(((high << 32) | low) as i64)
            }
            CONSTANT_DOUBLE => {
                let high = reader.read_u32()? as u64;
                let low = reader.read_u32()? as u64;
                Constant::Double(f64::from_bits((high << 32) | low))
            }
            CONSTANT_CLASS => Constant::Class(reader.read_u16()?),
            CONSTANT_STRING => Constant::String(reader.read_u16()?),
            CONSTANT_FIELDREF => Constant::FieldRef(reader.read_u16()?, reader.read_u16()?),
            CONSTANT_METHODREF => Constant::MethodRef(reader.read_u16()?, reader.read_u16()?),
            CONSTANT_INTERFACEMETHODREF => Constant::InterfaceMethodRef(reader.read_u16()?, reader.read_u16()?),
            CONSTANT_NAMEANDTYPE => Constant::NameAndType(reader.read_u16()?, reader.read_u16()?),
            CONSTANT_METHODHANDLE => Constant::MethodHandle(reader.read_u8()?, reader.read_u16()?),
            CONSTANT_METHODTYPE => Constant::MethodType(reader.read_u16()?),
            CONSTANT_DYNAMIC => Constant::Dynamic(reader.read_u16()?, reader.read_u16()?),
            CONSTANT_INVOKEDYNAMIC => Constant::InvokeDynamic(reader.read_u16()?, reader.read_u16()?),
            CONSTANT_MODULE => Constant::Module(reader.read_u16()?),
            CONSTANT_PACKAGE => Constant::Package(reader.read_u16()?),
            _ => return Err(ClassFormatError::UnknownConstantTag { tag, offset }),
        };
        // A wide entry in the last slot would overflow the declared count
        if constant.is_wide() && pool.len() + 2 >= count as usize {
            return Err(ConstPoolError::InvalidIndex(count).into());
        }
        pool.push(constant)?;
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::writer::ClassfileWritable;

    fn minimal_class() -> Vec<u8> {
        let mut cf = ClassFile::new();
        cf.this_class = cf.constant_pool.add_class("p/Minimal").unwrap();
        cf.super_class = cf.constant_pool.add_class("java/lang/Object").unwrap();
        cf.to_classfile_bytes()
    }

    #[test]
    fn test_reads_minimal_class() {
        let cf = ClassReader::read(&minimal_class()).unwrap();
        assert_eq!(cf.class_name().unwrap(), "p/Minimal");
        assert_eq!(cf.super_name().unwrap(), Some("java/lang/Object"));
        assert!(cf.methods.is_empty());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = minimal_class();
        bytes[0] = 0xCB;
        assert!(matches!(ClassReader::read(&bytes), Err(ClassFormatError::InvalidMagic(_))));
    }

    #[test]
    fn test_rejects_truncated_input() {
        let bytes = minimal_class();
        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(ClassReader::read(truncated), Err(ClassFormatError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut bytes = minimal_class();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(ClassReader::read(&bytes).unwrap_err(), ClassFormatError::TrailingBytes(2));
    }

    #[test]
    fn test_rejects_unknown_tag() {
        let mut bytes = minimal_class();
        // first constant tag sits right after magic, version and pool count
        bytes[10] = 2;
        assert!(matches!(
            ClassReader::read(&bytes),
            Err(ClassFormatError::UnknownConstantTag { tag: 2, offset: 10 })
        ));
    }

    #[test]
    fn test_keeps_unpaired_surrogate_as_raw_bytes() {
        let mut cf = ClassFile::new();
        cf.this_class = cf.constant_pool.add_class("p/Sur").unwrap();
        cf.super_class = cf.constant_pool.add_class("java/lang/Object").unwrap();
        let raw = cf.constant_pool.push(Constant::Utf8Raw(vec![0xED, 0xA0, 0x80, b'x'])).unwrap();
        cf.constant_pool.push(Constant::String(raw)).unwrap();
        let bytes = cf.to_classfile_bytes();

        let read = ClassReader::read(&bytes).unwrap();
        assert_eq!(read.constant_pool.get(raw), Some(&Constant::Utf8Raw(vec![0xED, 0xA0, 0x80, b'x'])));
        assert_eq!(read.constant_pool.utf8(raw), Err(ConstPoolError::NotUnicode(raw)));
        assert_eq!(read.to_classfile_bytes(), bytes);
    }

    #[test]
    fn test_rejects_malformed_utf8() {
        let mut bytes = minimal_class();
        // first Utf8 entry: tag at 10, length at 11..13, text from 13
        bytes[13] = 0xF0;
        assert!(matches!(ClassReader::read(&bytes), Err(ClassFormatError::InvalidUtf8 { index: 1 })));
    }
}
