//! Antelope `name`: up to 13 characters packed base-32 into a u64.

use antelope_abi_core::error::{CodecError, CodecResult};
use serde_json::Value;

use super::expect_str;

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

fn char_to_symbol(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some((c - b'a') as u64 + 6),
        b'1'..=b'5' => Some((c - b'1') as u64 + 1),
        b'.' => Some(0),
        _ => None,
    }
}

/// Pack a name string. The first 12 characters take 5 bits each, a 13th takes 4.
pub fn string_to_name(s: &str) -> CodecResult<u64> {
    let bytes = s.as_bytes();
    if bytes.len() > 13 {
        return Err(CodecError::format(
            "name",
            format!("'{}' is longer than 13 characters", s),
        ));
    }

    let mut value = 0u64;
    for (i, &c) in bytes.iter().enumerate() {
        let symbol = char_to_symbol(c).ok_or_else(|| {
            CodecError::format(
                "name",
                format!("'{}' has invalid character at position {}", s, i),
            )
        })?;
        if i < 12 {
            value |= symbol << (64 - 5 * (i + 1));
        } else {
            if symbol > 0x0f {
                return Err(CodecError::format(
                    "name",
                    format!("'{}': 13th character must be one of .1-5a-j", s),
                ));
            }
            value |= symbol;
        }
    }
    Ok(value)
}

/// Unpack a name, trimming trailing dots.
pub fn name_to_string(value: u64) -> String {
    let mut chars = [b'.'; 13];
    let mut tmp = value;
    for i in 0..13 {
        let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
        chars[12 - i] = CHARMAP[(tmp & mask) as usize];
        tmp >>= shift;
    }
    let s: String = chars.iter().map(|&c| c as char).collect();
    s.trim_end_matches('.').to_string()
}

pub fn encode_name(out: &mut Vec<u8>, s: &str) -> CodecResult<()> {
    out.extend_from_slice(&string_to_name(s)?.to_le_bytes());
    Ok(())
}

pub fn encode_name_value(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    encode_name(out, expect_str("name", value)?)
}
