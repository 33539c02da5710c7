//! Java bytecode opcodes emitted by the stub generator

pub const NOP: u8 = 0x00;
pub const ACONST_NULL: u8 = 0x01;
pub const LDC: u8 = 0x12;
pub const LDC_W: u8 = 0x13;
pub const DUP: u8 = 0x59;
pub const IRETURN: u8 = 0xac;
pub const LRETURN: u8 = 0xad;
pub const FRETURN: u8 = 0xae;
pub const DRETURN: u8 = 0xaf;
pub const ARETURN: u8 = 0xb0;
pub const RETURN: u8 = 0xb1;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const NEW: u8 = 0xbb;
pub const ATHROW: u8 = 0xbf;

/// Mnemonic for an opcode, used by debug output and `inspect`
pub fn mnemonic(op: u8) -> &'static str {
    match op {
        NOP => "nop",
        ACONST_NULL => "aconst_null",
        LDC => "ldc",
        LDC_W => "ldc_w",
        DUP => "dup",
        IRETURN => "ireturn",
        LRETURN => "lreturn",
        FRETURN => "freturn",
        DRETURN => "dreturn",
        ARETURN => "areturn",
        RETURN => "return",
        INVOKEVIRTUAL => "invokevirtual",
        INVOKESPECIAL => "invokespecial",
        INVOKESTATIC => "invokestatic",
        NEW => "new",
        ATHROW => "athrow",
        _ => "<other>",
    }
}

/// Operand bytes following a known opcode; `None` for opcodes not listed here
pub fn operand_length(op: u8) -> Option<usize> {
    match op {
        NOP | ACONST_NULL | DUP | IRETURN | LRETURN | FRETURN | DRETURN | ARETURN | RETURN | ATHROW => Some(0),
        LDC => Some(1),
        LDC_W | INVOKEVIRTUAL | INVOKESPECIAL | INVOKESTATIC | NEW => Some(2),
        _ => None,
    }
}

/// Render straight-line code as mnemonics with operands.
///
/// Rendering stops at the first opcode this module does not know, since its
/// operand length is unknown; the rest is summarised as a byte count.
pub fn disassemble(code: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut pc = 0;
    while pc < code.len() {
        let op = code[pc];
        let len = match operand_length(op) {
            Some(len) if pc + 1 + len <= code.len() => len,
            _ => {
                out.push(format!("<{} bytes>", code.len() - pc));
                break;
            }
        };
        let operand = code[pc + 1..pc + 1 + len].iter().fold(0u32, |acc, b| (acc << 8) | *b as u32);
        if len == 0 {
            out.push(mnemonic(op).to_string());
        } else {
            out.push(format!("{} #{}", mnemonic(op), operand));
        }
        pc += 1 + len;
    }
    out
}

/// Whether the opcode ends straight-line execution
pub fn is_terminal(op: u8) -> bool {
    matches!(op, IRETURN | LRETURN | FRETURN | DRETURN | ARETURN | RETURN | ATHROW)
}
