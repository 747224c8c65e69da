//! Length-prefixed `bytes`/`string`, fixed checksums and opaque `float128`.

use antelope_abi_core::error::{CodecError, CodecResult};
use serde_json::Value;

use super::expect_str;
use super::number::write_varuint32;
use crate::hex::hex_decode;

fn write_len(out: &mut Vec<u8>, type_name: &str, len: usize) -> CodecResult<()> {
    let len = u32::try_from(len)
        .map_err(|_| CodecError::range(type_name, len, "length exceeds varuint32"))?;
    write_varuint32(out, len);
    Ok(())
}

/// Hex input, emitted as byte length then raw bytes.
pub fn encode_bytes(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let raw = hex_decode("bytes", expect_str("bytes", value)?)?;
    write_len(out, "bytes", raw.len())?;
    out.extend_from_slice(&raw);
    Ok(())
}

/// UTF-8 byte length then the bytes; the empty string is a single `0x00`.
pub fn encode_string(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let s = expect_str("string", value)?;
    write_len(out, "string", s.len())?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Hex digest right-padded with zeros to `size` bytes.
pub fn encode_checksum(
    out: &mut Vec<u8>,
    type_name: &str,
    size: usize,
    value: &Value,
) -> CodecResult<()> {
    let raw = hex_decode(type_name, expect_str(type_name, value)?)?;
    if raw.len() > size {
        return Err(CodecError::range(
            type_name,
            raw.len(),
            format!("digest is longer than {} bytes", size),
        ));
    }
    out.extend_from_slice(&raw);
    out.resize(out.len() + size - raw.len(), 0);
    Ok(())
}

/// 32 hex characters copied through without numeric interpretation.
pub fn encode_float128(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let s = expect_str("float128", value)?;
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() != 32 {
        return Err(CodecError::format(
            "float128",
            format!("expected 32 hex characters, got {}", s.len()),
        ));
    }
    out.extend_from_slice(&hex_decode("float128", s)?);
    Ok(())
}
