//! Instruction sequences for generated method bodies

use crate::classfile::code::Code;
use crate::classfile::constpool::ConstantPool;
use crate::classfile::error::{ConstPoolResult, DescriptorError};
use crate::classfile::defs::CONSTRUCTOR_METHOD_NAME;
use crate::classfile::{opcodes, CodeAttribute};
use crate::consts::{EXCEPTION_CLASS, EXCEPTION_CONSTRUCTOR_DESCRIPTOR, HELPER_METHOD_DESCRIPTOR, STUB_MESSAGE};

/// Pool entries needed to construct the diagnostic exception
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExceptionRefs {
    pub class: u16,
    pub message: u16,
    pub constructor: u16,
}

impl ExceptionRefs {
    pub(crate) fn intern(pool: &mut ConstantPool) -> ConstPoolResult<Self> {
        Ok(Self {
            class: pool.add_class(EXCEPTION_CLASS)?,
            message: pool.add_string(STUB_MESSAGE)?,
            constructor: pool.add_method_ref(EXCEPTION_CLASS, CONSTRUCTOR_METHOD_NAME, EXCEPTION_CONSTRUCTOR_DESCRIPTOR)?,
        })
    }
}

/// `new; dup; ldc message; invokespecial <init>` leaves one exception reference on the stack
fn emit_new_exception(code: &mut Code, refs: ExceptionRefs) -> Result<(), DescriptorError> {
    code.emitop2(opcodes::NEW, refs.class);
    code.emitop(opcodes::DUP);
    code.emit_ldc(refs.message);
    code.emit_invoke(opcodes::INVOKESPECIAL, refs.constructor, EXCEPTION_CONSTRUCTOR_DESCRIPTOR)
}

/// Body of the synthetic helper: build the exception and return it
pub(crate) fn helper_body(refs: ExceptionRefs) -> Result<CodeAttribute, DescriptorError> {
    let mut code = Code::new(0);
    emit_new_exception(&mut code, refs)?;
    code.emitop(opcodes::ARETURN);
    Ok(code.into_attribute())
}

/// Body of a stubbed class method: `invokestatic helper; athrow`
pub(crate) fn delegating_body(helper_ref: u16, max_locals: u16) -> Result<CodeAttribute, DescriptorError> {
    let mut code = Code::new(max_locals);
    code.emit_invoke(opcodes::INVOKESTATIC, helper_ref, HELPER_METHOD_DESCRIPTOR)?;
    code.emitop(opcodes::ATHROW);
    Ok(code.into_attribute())
}

/// Body of a stubbed interface method, which has no helper to call
pub(crate) fn inline_raise_body(refs: ExceptionRefs, max_locals: u16) -> Result<CodeAttribute, DescriptorError> {
    let mut code = Code::new(max_locals);
    emit_new_exception(&mut code, refs)?;
    code.emitop(opcodes::ATHROW);
    Ok(code.into_attribute())
}

/// Bare `return`, used for static initializers under `InitializerPolicy::Empty`
pub(crate) fn empty_body(max_locals: u16) -> CodeAttribute {
    let mut code = Code::new(max_locals);
    code.emitop(opcodes::RETURN);
    code.into_attribute()
}
