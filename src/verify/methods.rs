use std::collections::HashSet;

use crate::classfile::attribute::{parse_exceptions, CodeAttribute};
use crate::classfile::class::ClassFile;
use crate::classfile::constpool::Constant;
use crate::classfile::defs::attribute_names;
use crate::classfile::descriptor::parameter_slots;
use crate::classfile::method::MethodInfo;
use crate::classfile::opcodes;
use crate::consts::{HELPER_METHOD_DESCRIPTOR, HELPER_METHOD_NAME};
use super::method_access_flags;

/// Largest code array a method may carry
const MAX_CODE_LENGTH: usize = 65535;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodVerifyError {
    #[error("Invalid constant pool index {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Invalid constant pool index type {0}")]
    InvalidConstantPoolIndexType(u16),
    #[error("Invalid method access flags: 0x{0:04x}")]
    InvalidMethodAccessFlags(u16),
    #[error("Method {0} must have Code attribute unless abstract or native")]
    MissingCodeAttribute(String),
    #[error("Abstract or native method {0} must not have Code attribute")]
    ForbiddenCodeAttribute(String),
    #[error("Duplicate method attribute {attribute} on {method}")]
    DuplicateMethodAttribute { method: String, attribute: &'static str },
    #[error("Invalid Code attribute on {method}: {reason}")]
    InvalidCode { method: String, reason: String },
    #[error("Invalid method attribute: duplicate exceptions declared")]
    DuplicateExceptions,
    #[error("Duplicate method: {0}")]
    DuplicateMethod(String),
    #[error("Interface declares the stub helper {0}")]
    HelperInInterface(String),
}

pub type Result<T> = std::result::Result<T, MethodVerifyError>;

/// Verify the ClassFile methods
pub fn verify(class_file: &ClassFile) -> Result<()> {
    let pool = &class_file.constant_pool;
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for method in &class_file.methods {
        if let Err(method_access_flags::MethodAccessFlagsError::Invalid(bits)) =
            method_access_flags::verify(class_file, method)
        {
            return Err(MethodVerifyError::InvalidMethodAccessFlags(bits));
        }
        verify_utf8_index(class_file, method.name_index)?;
        verify_utf8_index(class_file, method.descriptor_index)?;

        let name = method.name(pool).unwrap_or_default();
        let descriptor = method.descriptor(pool).unwrap_or_default();
        if !seen.insert((name, descriptor)) {
            return Err(MethodVerifyError::DuplicateMethod(format!("{}{}", name, descriptor)));
        }
        if class_file.is_interface() && name == HELPER_METHOD_NAME && descriptor == HELPER_METHOD_DESCRIPTOR {
            return Err(MethodVerifyError::HelperInInterface(format!("{}{}", name, descriptor)));
        }

        verify_method_attributes(class_file, method, name, descriptor)?;
    }
    Ok(())
}

fn verify_utf8_index(class_file: &ClassFile, index: u16) -> Result<()> {
    match class_file.constant_pool.get(index) {
        Some(Constant::Utf8(_)) => Ok(()),
        None => Err(MethodVerifyError::InvalidConstantPoolIndex(index)),
        _ => Err(MethodVerifyError::InvalidConstantPoolIndexType(index)),
    }
}

fn verify_method_attributes(class_file: &ClassFile, method: &MethodInfo, name: &str, descriptor: &str) -> Result<()> {
    let pool = &class_file.constant_pool;
    let mut code: Option<CodeAttribute> = None;
    let mut has_exceptions = false;

    for a in &method.attributes {
        if a.is_named(pool, attribute_names::CODE) {
            if code.is_some() {
                return Err(MethodVerifyError::DuplicateMethodAttribute {
                    method: name.to_string(),
                    attribute: attribute_names::CODE,
                });
            }
            let parsed = CodeAttribute::parse(&a.info).map_err(|e| MethodVerifyError::InvalidCode {
                method: name.to_string(),
                reason: e.to_string(),
            })?;
            code = Some(parsed);
        } else if a.is_named(pool, attribute_names::EXCEPTIONS) {
            if has_exceptions {
                return Err(MethodVerifyError::DuplicateMethodAttribute {
                    method: name.to_string(),
                    attribute: attribute_names::EXCEPTIONS,
                });
            }
            has_exceptions = true;
            let classes = parse_exceptions(&a.info).map_err(|_| MethodVerifyError::InvalidConstantPoolIndex(a.name_index))?;
            let mut seen: HashSet<u16> = HashSet::new();
            for class in classes {
                if !seen.insert(class) {
                    return Err(MethodVerifyError::DuplicateExceptions);
                }
                match pool.get(class) {
                    Some(Constant::Class(_)) => {}
                    None => return Err(MethodVerifyError::InvalidConstantPoolIndex(class)),
                    _ => return Err(MethodVerifyError::InvalidConstantPoolIndexType(class)),
                }
            }
        }
    }

    let bodiless = method.is_abstract() || method.is_native();
    match (bodiless, code) {
        (true, Some(_)) => Err(MethodVerifyError::ForbiddenCodeAttribute(name.to_string())),
        (false, None) => Err(MethodVerifyError::MissingCodeAttribute(name.to_string())),
        (false, Some(code)) => verify_code(method, name, descriptor, &code),
        (true, None) => Ok(()),
    }
}

fn verify_code(method: &MethodInfo, name: &str, descriptor: &str, code: &CodeAttribute) -> Result<()> {
    let invalid = |reason: String| MethodVerifyError::InvalidCode { method: name.to_string(), reason };

    if code.code.is_empty() || code.code.len() > MAX_CODE_LENGTH {
        return Err(invalid(format!("code length {} out of range", code.code.len())));
    }
    if code.code.last() == Some(&opcodes::ATHROW) && code.max_stack == 0 {
        return Err(invalid("athrow needs a stack slot".to_string()));
    }
    let params = parameter_slots(descriptor).map_err(|e| invalid(e.to_string()))?;
    let receiver = if method.is_static() { 0 } else { 1 };
    if (code.max_locals as u32) < params as u32 + receiver {
        return Err(invalid(format!(
            "max_locals {} cannot hold {} parameter slots",
            code.max_locals,
            params as u32 + receiver
        )));
    }
    for entry in &code.exception_table {
        if entry.start_pc >= entry.end_pc || entry.end_pc as usize > code.code.len() || entry.handler_pc as usize >= code.code.len() {
            return Err(invalid("exception table entry out of range".to_string()));
        }
    }
    Ok(())
}
