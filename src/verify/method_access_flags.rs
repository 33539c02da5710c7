use crate::classfile::class::ClassFile;
use crate::classfile::flag::access_flags;
use crate::classfile::method::MethodInfo;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodAccessFlagsError {
    #[error("Invalid method access flags: 0x{0:04x}")]
    Invalid(u16),
}

pub type Result<T> = std::result::Result<T, MethodAccessFlagsError>;

/// Verify method access flags
pub fn verify(class_file: &ClassFile, method: &MethodInfo) -> Result<()> {
    let flags = method.access_flags;
    let public_set = flags & access_flags::ACC_PUBLIC != 0;
    let protected_set = flags & access_flags::ACC_PROTECTED != 0;
    let private_set = flags & access_flags::ACC_PRIVATE != 0;

    if (public_set as u8 + protected_set as u8 + private_set as u8) > 1 {
        return Err(MethodAccessFlagsError::Invalid(flags));
    }

    if class_file.is_interface()
        && (flags & access_flags::ACC_PROTECTED != 0
            || flags & access_flags::ACC_FINAL != 0
            || flags & access_flags::ACC_SYNCHRONIZED != 0
            || flags & access_flags::ACC_NATIVE != 0)
    {
        return Err(MethodAccessFlagsError::Invalid(flags));
    }

    if flags & access_flags::ACC_ABSTRACT != 0
        && (flags & access_flags::ACC_PRIVATE != 0
            || flags & access_flags::ACC_STATIC != 0
            || flags & access_flags::ACC_FINAL != 0
            || flags & access_flags::ACC_SYNCHRONIZED != 0
            || flags & access_flags::ACC_NATIVE != 0)
    {
        return Err(MethodAccessFlagsError::Invalid(flags));
    }

    Ok(())
}
