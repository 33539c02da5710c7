use crate::classfile::class::ClassFile;
use crate::classfile::constpool::Constant;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InterfacesVerifyError {
    #[error("Invalid constant pool index {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Invalid constant pool index type {0}")]
    InvalidConstantPoolIndexType(u16),
}

pub type Result<T> = std::result::Result<T, InterfacesVerifyError>;

/// Verify the ClassFile interfaces
pub fn verify(class_file: &ClassFile) -> Result<()> {
    for interface in &class_file.interfaces {
        match class_file.constant_pool.get(*interface) {
            Some(Constant::Class(_)) => {}
            None => return Err(InterfacesVerifyError::InvalidConstantPoolIndex(*interface)),
            _ => return Err(InterfacesVerifyError::InvalidConstantPoolIndexType(*interface)),
        }
    }
    Ok(())
}
