use crate::classfile::class::ClassFile;
use crate::classfile::constpool::Constant;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstantPoolVerifyError {
    #[error("Invalid constant pool index {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Invalid constant pool index type {0}")]
    InvalidConstantPoolIndexType(u16),
    #[error("Unusable constant pool slot {0} does not follow a Long or Double")]
    MisplacedUnusableSlot(u16),
    #[error("BootstrapMethods attribute not defined")]
    BootstrapMethodsNotDefined,
}

pub type Result<T> = std::result::Result<T, ConstantPoolVerifyError>;

/// Verify the ClassFile ConstantPool
pub fn verify(class_file: &ClassFile) -> Result<()> {
    verify_wide_slots(class_file)?;
    verify_constant_indexes(class_file)?;
    Ok(())
}

fn verify_wide_slots(class_file: &ClassFile) -> Result<()> {
    let pool = &class_file.constant_pool.constants;
    for (i, constant) in pool.iter().enumerate() {
        let follows_wide = i > 0 && pool[i - 1].is_wide();
        let is_unusable = matches!(constant, Constant::Unusable);
        if is_unusable != follows_wide {
            return Err(ConstantPoolVerifyError::MisplacedUnusableSlot((i + 1) as u16));
        }
    }
    Ok(())
}

fn expect<F>(class_file: &ClassFile, owner: u16, target: u16, accept: F) -> Result<()>
where
    F: Fn(&Constant) -> bool,
{
    match class_file.constant_pool.get(target) {
        Some(c) if accept(c) => Ok(()),
        None => Err(ConstantPoolVerifyError::InvalidConstantPoolIndex(owner)),
        _ => Err(ConstantPoolVerifyError::InvalidConstantPoolIndexType(owner)),
    }
}

fn is_utf8(c: &Constant) -> bool {
    matches!(c, Constant::Utf8(_) | Constant::Utf8Raw(_))
}

fn verify_constant_indexes(class_file: &ClassFile) -> Result<()> {
    for (index, constant) in class_file.constant_pool.iter() {
        match constant {
            Constant::Class(name_index)
            | Constant::Module(name_index)
            | Constant::Package(name_index)
            | Constant::String(name_index)
            | Constant::MethodType(name_index) => expect(class_file, index, *name_index, is_utf8)?,
            Constant::FieldRef(class_index, nat_index)
            | Constant::MethodRef(class_index, nat_index)
            | Constant::InterfaceMethodRef(class_index, nat_index) => {
                expect(class_file, index, *class_index, |c| matches!(c, Constant::Class(_)))?;
                expect(class_file, index, *nat_index, |c| matches!(c, Constant::NameAndType(_, _)))?;
            }
            Constant::NameAndType(name_index, desc_index) => {
                expect(class_file, index, *name_index, is_utf8)?;
                expect(class_file, index, *desc_index, is_utf8)?;
            }
            Constant::MethodHandle(_kind, reference_index) => {
                expect(class_file, index, *reference_index, |c| {
                    matches!(c, Constant::FieldRef(_, _) | Constant::MethodRef(_, _) | Constant::InterfaceMethodRef(_, _))
                })?;
            }
            Constant::Dynamic(_bsm_index, nat_index)
            | Constant::InvokeDynamic(_bsm_index, nat_index) => {
                let has_bootstrap = class_file
                    .attributes
                    .iter()
                    .any(|a| a.is_named(&class_file.constant_pool, "BootstrapMethods"));
                if !has_bootstrap {
                    return Err(ConstantPoolVerifyError::BootstrapMethodsNotDefined);
                }
                expect(class_file, index, *nat_index, |c| matches!(c, Constant::NameAndType(_, _)))?;
            }
            _ => {}
        }
    }
    Ok(())
}
