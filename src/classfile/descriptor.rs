//! Method descriptor inspection for verifier metadata

use super::error::DescriptorError;

/// Local-variable slots taken by the parameters of `descriptor` (long and double take two)
pub fn parameter_slots(descriptor: &str) -> Result<u16, DescriptorError> {
    Ok(parse(descriptor)?.0)
}

/// Operand-stack slots taken by the return value of `descriptor` (void takes none)
pub fn return_slots(descriptor: &str) -> Result<u16, DescriptorError> {
    Ok(parse(descriptor)?.1)
}

fn parse(descriptor: &str) -> Result<(u16, u16), DescriptorError> {
    let invalid = || DescriptorError::InvalidMethodDescriptor { descriptor: descriptor.to_string() };
    let bytes = descriptor.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(invalid());
    }
    let mut pos = 1;
    let mut slots: u16 = 0;
    loop {
        match bytes.get(pos) {
            Some(b')') => {
                pos += 1;
                break;
            }
            Some(_) => {
                let (width, next) = field_type(bytes, pos).ok_or_else(invalid)?;
                slots = slots.checked_add(width).ok_or_else(invalid)?;
                pos = next;
            }
            None => return Err(invalid()),
        }
    }
    let ret = match bytes.get(pos) {
        Some(b'V') if pos + 1 == bytes.len() => 0,
        Some(_) => {
            let (width, next) = field_type(bytes, pos).ok_or_else(invalid)?;
            if next != bytes.len() {
                return Err(invalid());
            }
            width
        }
        None => return Err(invalid()),
    };
    Ok((slots, ret))
}

/// Parse one field type at `pos`, returning its slot width and the next position
fn field_type(bytes: &[u8], pos: usize) -> Option<(u16, usize)> {
    match *bytes.get(pos)? {
        b'B' | b'C' | b'F' | b'I' | b'S' | b'Z' => Some((1, pos + 1)),
        b'J' | b'D' => Some((2, pos + 1)),
        b'L' => {
            let end = bytes[pos..].iter().position(|b| *b == b';')?;
            if end == 1 {
                return None;
            }
            Some((1, pos + end + 1))
        }
        b'[' => {
            let (_, next) = field_type(bytes, pos + 1)?;
            Some((1, next))
        }
        _ => None,
    }
}
