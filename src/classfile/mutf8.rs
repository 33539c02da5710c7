//! Modified UTF-8 as used by `CONSTANT_Utf8_info`
//!
//! NUL is encoded as `C0 80` and supplementary characters as a pair of
//! three-byte surrogates. Decoding only accepts the canonical encoding so that
//! a decoded string always re-encodes to the exact same bytes.

/// Encode a string into modified UTF-8
pub fn encode(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len());
    for ch in value.chars() {
        let c = ch as u32;
        match c {
            0x01..=0x7F => bytes.push(c as u8),
            0x00 | 0x80..=0x7FF => {
                bytes.push(0xC0 | (c >> 6) as u8);
                bytes.push(0x80 | (c & 0x3F) as u8);
            }
            0x800..=0xFFFF => push_three(&mut bytes, c),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    push_three(&mut bytes, *unit as u32);
                }
            }
        }
    }
    bytes
}

fn push_three(bytes: &mut Vec<u8>, c: u32) {
    bytes.push(0xE0 | (c >> 12) as u8);
    bytes.push(0x80 | ((c >> 6) & 0x3F) as u8);
    bytes.push(0x80 | (c & 0x3F) as u8);
}

/// Decode modified UTF-8, returning `None` for malformed or non-canonical input,
/// and for well-formed input that is not valid Unicode (a lone surrogate)
pub fn decode(bytes: &[u8]) -> Option<String> {
    let decoded = String::from_utf16(&code_units(bytes)?).ok()?;
    // Reject overlong forms so that decode/encode is lossless
    if encode(&decoded) != bytes {
        return None;
    }
    Some(decoded)
}

/// Whether `bytes` has the byte structure of modified UTF-8: no raw NUL, no
/// four-byte forms, every lead byte followed by its continuation bytes.
///
/// Well-formed input need not be valid Unicode; string literals may carry
/// unpaired surrogates.
pub fn is_well_formed(bytes: &[u8]) -> bool {
    code_units(bytes).is_some()
}

/// UTF-16 code units encoded by `bytes`, unpaired surrogates included
fn code_units(bytes: &[u8]) -> Option<Vec<u16>> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let a = bytes[i] as u32;
        if a == 0 {
            return None;
        }
        if a <= 0x7F {
            units.push(a as u16);
            i += 1;
        } else if a & 0xE0 == 0xC0 {
            let b = continuation(bytes, i + 1)?;
            units.push((((a & 0x1F) << 6) | b) as u16);
            i += 2;
        } else if a & 0xF0 == 0xE0 {
            let b = continuation(bytes, i + 1)?;
            let c = continuation(bytes, i + 2)?;
            units.push((((a & 0x0F) << 12) | (b << 6) | c) as u16);
            i += 3;
        } else {
            return None;
        }
    }
    Some(units)
}

fn continuation(bytes: &[u8], at: usize) -> Option<u32> {
    let b = *bytes.get(at)? as u32;
    if b & 0xC0 != 0x80 {
        return None;
    }
    Some(b & 0x3F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nul_uses_two_bytes() {
        assert_eq!(encode("a\0b"), vec![b'a', 0xC0, 0x80, b'b']);
        assert_eq!(decode(&[b'a', 0xC0, 0x80, b'b']).as_deref(), Some("a\0b"));
    }

    #[test]
    fn test_supplementary_character_as_surrogate_pair() {
        let bytes = encode("\u{1F600}");
        assert_eq!(bytes.len(), 6);
        assert_eq!(bytes[0], 0xED);
        assert_eq!(decode(&bytes).as_deref(), Some("\u{1F600}"));
    }

    #[test]
    fn test_rejects_raw_nul_and_overlong() {
        assert_eq!(decode(&[0x00]), None);
        // overlong encoding of 'A'
        assert_eq!(decode(&[0xC1, 0x81]), None);
        // truncated three-byte sequence
        assert_eq!(decode(&[0xE2, 0x82]), None);
    }

    #[test]
    fn test_lone_surrogate_is_well_formed_but_not_text() {
        // "\uD800x" as javac writes it
        let bytes = [0xED, 0xA0, 0x80, b'x'];
        assert!(is_well_formed(&bytes));
        assert_eq!(decode(&bytes), None);
        assert!(!is_well_formed(&[0x00]));
        assert!(!is_well_formed(&[0xF0, 0x9F, 0x98, 0x80]));
    }
}
