use std::collections::HashSet;

use crate::classfile::class::ClassFile;
use crate::classfile::constpool::Constant;
use crate::classfile::flag::access_flags;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldVerifyError {
    #[error("Invalid constant pool index {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Invalid constant pool index type {0}")]
    InvalidConstantPoolIndexType(u16),
    #[error("Invalid field access flags: 0x{0:04x}")]
    InvalidFieldAccessFlags(u16),
    #[error("Duplicate field: {0}")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, FieldVerifyError>;

pub fn verify(class_file: &ClassFile) -> Result<()> {
    let pool = &class_file.constant_pool;
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for field in &class_file.fields {
        verify_utf8_index(class_file, field.name_index)?;
        verify_utf8_index(class_file, field.descriptor_index)?;
        verify_access_flags(class_file, field.access_flags)?;
        let name = field.name(pool).unwrap_or_default();
        let descriptor = field.descriptor(pool).unwrap_or_default();
        if !seen.insert((name, descriptor)) {
            return Err(FieldVerifyError::DuplicateField(format!("{} {}", name, descriptor)));
        }
    }
    Ok(())
}

fn verify_utf8_index(class_file: &ClassFile, index: u16) -> Result<()> {
    match class_file.constant_pool.get(index) {
        Some(Constant::Utf8(_)) => Ok(()),
        None => Err(FieldVerifyError::InvalidConstantPoolIndex(index)),
        _ => Err(FieldVerifyError::InvalidConstantPoolIndexType(index)),
    }
}

fn verify_access_flags(class_file: &ClassFile, flags: u16) -> Result<()> {
    let public_set = flags & access_flags::ACC_PUBLIC != 0;
    let protected_set = flags & access_flags::ACC_PROTECTED != 0;
    let private_set = flags & access_flags::ACC_PRIVATE != 0;

    if (public_set as u8 + protected_set as u8 + private_set as u8) > 1 {
        return Err(FieldVerifyError::InvalidFieldAccessFlags(flags));
    }

    if class_file.is_interface() {
        let must = access_flags::ACC_PUBLIC | access_flags::ACC_STATIC | access_flags::ACC_FINAL;
        let illegal = access_flags::ACC_PRIVATE
            | access_flags::ACC_PROTECTED
            | access_flags::ACC_VOLATILE
            | access_flags::ACC_TRANSIENT
            | access_flags::ACC_ENUM;
        if flags & must != must || flags & illegal != 0 {
            return Err(FieldVerifyError::InvalidFieldAccessFlags(flags));
        }
    } else if flags & access_flags::ACC_FINAL != 0 && flags & access_flags::ACC_VOLATILE != 0 {
        return Err(FieldVerifyError::InvalidFieldAccessFlags(flags));
    }
    Ok(())
}
