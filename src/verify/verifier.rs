use crate::classfile::class::ClassFile;
use crate::classfile::constpool::Constant;
use crate::classfile::defs::OBJECT_CLASS_NAME;
use super::{class_access_flags, constant_pool, fields, interfaces, methods};

pub type VerifyResult<T> = Result<T, VerifyError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Invalid this_class index {0}")]
    InvalidThisClass(u16),
    #[error("Invalid super_class index {0}")]
    InvalidSuperClass(u16),
    #[error(transparent)]
    ConstantPool(#[from] constant_pool::ConstantPoolVerifyError),
    #[error(transparent)]
    ClassAccessFlags(#[from] class_access_flags::ClassAccessFlagsError),
    #[error(transparent)]
    Interfaces(#[from] interfaces::InterfacesVerifyError),
    #[error(transparent)]
    Fields(#[from] fields::FieldVerifyError),
    #[error(transparent)]
    Methods(#[from] methods::MethodVerifyError),
}

/// Verify the ClassFile by orchestrating all sub-verifiers
pub fn verify(class_file: &ClassFile) -> VerifyResult<()> {
    constant_pool::verify(class_file)?;
    verify_this_class(class_file)?;
    let class_name = class_file.class_name().ok();
    class_access_flags::verify(class_file, class_name)?;
    verify_super_class(class_file)?;
    interfaces::verify(class_file)?;
    fields::verify(class_file)?;
    methods::verify(class_file)?;
    Ok(())
}

fn verify_this_class(class_file: &ClassFile) -> VerifyResult<()> {
    match class_file.constant_pool.get(class_file.this_class) {
        Some(Constant::Class(_)) => Ok(()),
        _ => Err(VerifyError::InvalidThisClass(class_file.this_class)),
    }
}

fn verify_super_class(class_file: &ClassFile) -> VerifyResult<()> {
    let super_class = class_file.super_class;

    // Only java/lang/Object and module descriptors omit a super class
    if super_class == 0 {
        let is_object = !class_file.is_interface() && class_file.class_name().ok() == Some(OBJECT_CLASS_NAME);
        return if is_object || class_file.is_module() { Ok(()) } else { Err(VerifyError::InvalidSuperClass(0)) };
    }

    match class_file.constant_pool.get(super_class) {
        Some(Constant::Class(_)) => Ok(()),
        _ => Err(VerifyError::InvalidSuperClass(super_class)),
    }
}
