//! Fixed-width integers, LEB128 varints, booleans and IEEE-754 floats.

use std::borrow::Cow;
use std::num::IntErrorKind;

use antelope_abi_core::error::{CodecError, CodecResult};
use serde_json::Value;

/// Largest integer a JSON number can carry without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Append `value` as unsigned LEB128: 7 bits per byte, high bit set on all but the last.
pub fn write_varuint32(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Zig-zag encode then write as varuint32.
pub fn write_varint32(out: &mut Vec<u8>, value: i32) {
    write_varuint32(out, zigzag32(value));
}

pub fn zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

pub fn varuint32_bytes(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(5);
    write_varuint32(&mut out, value);
    out
}

/// Text form of an integer input. Decimal strings pass through untouched so
/// 64- and 128-bit values keep full precision.
fn integer_text<'a>(type_name: &str, value: &'a Value) -> CodecResult<Cow<'a, str>> {
    match value {
        Value::String(s) => Ok(Cow::Borrowed(s.trim())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Cow::Owned(i.to_string()))
            } else if let Some(u) = n.as_u64() {
                Ok(Cow::Owned(u.to_string()))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(CodecError::format(
                        type_name,
                        format!("{} is not an integer", n),
                    ));
                }
                if f.abs() > MAX_SAFE_INTEGER {
                    return Err(CodecError::format(
                        type_name,
                        format!("{} loses precision as a JSON number, pass a decimal string", n),
                    ));
                }
                Ok(Cow::Owned(format!("{}", f as i128)))
            }
        }
        other => Err(CodecError::format(
            type_name,
            format!("expected an integer or decimal string, got {}", other),
        )),
    }
}

fn int_error(type_name: &str, text: &str, kind: &IntErrorKind) -> CodecError {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            CodecError::range(type_name, text, "does not fit in 128 bits")
        }
        _ => CodecError::format(type_name, format!("'{}' is not a decimal integer", text)),
    }
}

pub fn parse_signed(type_name: &str, value: &Value) -> CodecResult<i128> {
    let text = integer_text(type_name, value)?;
    text.parse::<i128>()
        .map_err(|e| int_error(type_name, &text, e.kind()))
}

pub fn parse_unsigned(type_name: &str, value: &Value) -> CodecResult<u128> {
    let text = integer_text(type_name, value)?;
    if text.starts_with('-') {
        return match text.parse::<i128>() {
            Ok(0) => Ok(0),
            Ok(_) => Err(CodecError::range(type_name, &text, "must not be negative")),
            Err(e) => Err(int_error(type_name, &text, e.kind())),
        };
    }
    text.parse::<u128>()
        .map_err(|e| int_error(type_name, &text, e.kind()))
}

pub fn parse_u32(type_name: &str, value: &Value) -> CodecResult<u32> {
    let v = parse_unsigned(type_name, value)?;
    u32::try_from(v).map_err(|_| CodecError::range(type_name, v, "must be within [0, 4294967295]"))
}

pub fn parse_i32(type_name: &str, value: &Value) -> CodecResult<i32> {
    let v = parse_signed(type_name, value)?;
    i32::try_from(v).map_err(|_| {
        CodecError::range(type_name, v, "must be within [-2147483648, 2147483647]")
    })
}

/// Two's-complement little-endian integer of `bits` width.
pub fn encode_signed(
    out: &mut Vec<u8>,
    type_name: &str,
    bits: u32,
    value: &Value,
) -> CodecResult<()> {
    let v = parse_signed(type_name, value)?;
    if bits < 128 {
        let min = -(1i128 << (bits - 1));
        let max = (1i128 << (bits - 1)) - 1;
        if v < min || v > max {
            return Err(CodecError::range(
                type_name,
                v,
                format!("must be within [{}, {}]", min, max),
            ));
        }
    }
    out.extend_from_slice(&v.to_le_bytes()[..(bits / 8) as usize]);
    Ok(())
}

/// Unsigned little-endian integer of `bits` width.
pub fn encode_unsigned(
    out: &mut Vec<u8>,
    type_name: &str,
    bits: u32,
    value: &Value,
) -> CodecResult<()> {
    let v = parse_unsigned(type_name, value)?;
    if bits < 128 {
        let max = (1u128 << bits) - 1;
        if v > max {
            return Err(CodecError::range(type_name, v, format!("must be within [0, {}]", max)));
        }
    }
    out.extend_from_slice(&v.to_le_bytes()[..(bits / 8) as usize]);
    Ok(())
}

pub fn parse_bool(value: &Value) -> CodecResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(CodecError::format("bool", format!("expected true/false, got {}", other))),
    }
}

fn parse_float(type_name: &str, value: &Value) -> CodecResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| CodecError::format(type_name, format!("{} is not a float", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| CodecError::format(type_name, format!("'{}': {}", s, e))),
        other => Err(CodecError::format(
            type_name,
            format!("expected a number, got {}", other),
        )),
    }
}

pub fn encode_float32(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let v = parse_float("float32", value)?;
    if v.is_finite() && v.abs() > f32::MAX as f64 {
        return Err(CodecError::range("float32", v, "exceeds the float32 range"));
    }
    out.extend_from_slice(&(v as f32).to_le_bytes());
    Ok(())
}

pub fn encode_float64(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let v = parse_float("float64", value)?;
    out.extend_from_slice(&v.to_le_bytes());
    Ok(())
}
