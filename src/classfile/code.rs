//! Straight-line bytecode buffer with operand-stack accounting
//!
//! Tracks the current and maximum stack depth as instructions are emitted so
//! that the resulting `Code` attribute carries exact verifier metadata. Only
//! branch-free sequences are supported, so no StackMapTable is ever needed.

use super::attribute::CodeAttribute;
use super::descriptor;
use super::error::DescriptorError;
use super::opcodes;

/// Stack state tracking
#[derive(Debug, Clone, Default)]
pub struct State {
    /// Current stack depth
    pub stacksize: u16,
    /// Maximum stack depth seen
    pub max_stacksize: u16,
}

impl State {
    pub fn push(&mut self, width: u16) {
        self.stacksize += width;
        self.max_stacksize = self.max_stacksize.max(self.stacksize);
    }

    pub fn pop(&mut self, width: u16) {
        self.stacksize = self.stacksize.saturating_sub(width);
    }
}

/// Code generation buffer
#[derive(Debug)]
pub struct Code {
    pub code: Vec<u8>,
    pub max_locals: u16,
    pub state: State,
    /// Cleared after a terminal instruction; later emits are dropped
    pub alive: bool,
}

impl Code {
    pub fn new(max_locals: u16) -> Self {
        Self {
            code: Vec::with_capacity(8),
            max_locals,
            state: State::default(),
            alive: true,
        }
    }

    pub fn get_cp(&self) -> usize {
        self.code.len()
    }

    /// Emit an opcode without operands
    pub fn emitop(&mut self, op: u8) {
        if !self.alive {
            return;
        }
        log::trace!("emit@{} stack={}: {}", self.get_cp(), self.state.stacksize, opcodes::mnemonic(op));
        self.code.push(op);
        match op {
            opcodes::ACONST_NULL => self.state.push(1),
            opcodes::DUP => self.state.push(1),
            opcodes::IRETURN | opcodes::FRETURN | opcodes::ARETURN | opcodes::ATHROW => self.state.pop(1),
            opcodes::LRETURN | opcodes::DRETURN => self.state.pop(2),
            _ => {}
        }
        if opcodes::is_terminal(op) {
            self.alive = false;
        }
    }

    /// Emit an opcode with a two-byte operand
    pub fn emitop2(&mut self, op: u8, od: u16) {
        if !self.alive {
            return;
        }
        self.emitop(op);
        self.code.extend_from_slice(&od.to_be_bytes());
        match op {
            opcodes::NEW | opcodes::LDC_W => self.state.push(1),
            _ => {}
        }
    }

    /// Load a single-slot constant, picking `ldc` or `ldc_w` by index width
    pub fn emit_ldc(&mut self, index: u16) {
        if !self.alive {
            return;
        }
        if index <= u8::MAX as u16 {
            self.emitop(opcodes::LDC);
            self.code.push(index as u8);
            self.state.push(1);
        } else {
            self.emitop2(opcodes::LDC_W, index);
        }
    }

    /// Emit a method invocation, popping arguments (and receiver) and pushing the result
    pub fn emit_invoke(&mut self, op: u8, method_ref: u16, method_descriptor: &str) -> Result<(), DescriptorError> {
        if !self.alive {
            return Ok(());
        }
        let args = descriptor::parameter_slots(method_descriptor)?;
        let ret = descriptor::return_slots(method_descriptor)?;
        self.emitop2(op, method_ref);
        let receiver = if op == opcodes::INVOKESTATIC { 0 } else { 1 };
        self.state.pop(args + receiver);
        self.state.push(ret);
        Ok(())
    }

    pub fn into_attribute(self) -> CodeAttribute {
        CodeAttribute::new(self.state.max_stacksize, self.max_locals, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_stack_tracks_peak() {
        let mut code = Code::new(0);
        code.emitop2(opcodes::NEW, 7);
        code.emitop(opcodes::DUP);
        code.emit_ldc(9);
        code.emit_invoke(opcodes::INVOKESPECIAL, 11, "(Ljava/lang/String;)V").unwrap();
        assert_eq!(code.state.stacksize, 1);
        code.emitop(opcodes::ARETURN);
        let attr = code.into_attribute();
        assert_eq!(attr.max_stack, 3);
        assert_eq!(attr.code, vec![opcodes::NEW, 0, 7, opcodes::DUP, opcodes::LDC, 9, opcodes::INVOKESPECIAL, 0, 11, opcodes::ARETURN]);
    }

    #[test]
    fn test_wide_ldc_and_dead_code() {
        let mut code = Code::new(2);
        code.emit_ldc(300);
        code.emitop(opcodes::ATHROW);
        code.emitop(opcodes::RETURN);
        let attr = code.into_attribute();
        assert_eq!(attr.code, vec![opcodes::LDC_W, 0x01, 0x2c, opcodes::ATHROW]);
        assert_eq!(attr.max_stack, 1);
        assert_eq!(attr.max_locals, 2);
    }
}
