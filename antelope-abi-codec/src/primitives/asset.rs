//! `asset`, `extended_asset`, `symbol` and `symbol_code`.

use antelope_abi_core::error::{CodecError, CodecResult};
use serde_json::Value;

use super::expect_str;
use super::name::encode_name;

pub const MAX_PRECISION: u8 = 18;
const MAX_CODE_LEN: usize = 7;

/// Ticker bytes, zero-padded to 7.
fn symbol_code_bytes(type_name: &str, code: &str) -> CodecResult<[u8; MAX_CODE_LEN]> {
    if code.is_empty() || code.len() > MAX_CODE_LEN {
        return Err(CodecError::format(
            type_name,
            format!("symbol code '{}' must be 1 to 7 characters", code),
        ));
    }
    if !code.bytes().all(|c| c.is_ascii_uppercase()) {
        return Err(CodecError::format(
            type_name,
            format!("symbol code '{}' must be uppercase A-Z", code),
        ));
    }
    let mut out = [0u8; MAX_CODE_LEN];
    out[..code.len()].copy_from_slice(code.as_bytes());
    Ok(out)
}

fn check_precision(type_name: &str, precision: u64) -> CodecResult<u8> {
    if precision > MAX_PRECISION as u64 {
        return Err(CodecError::range(type_name, precision, "precision must be at most 18"));
    }
    Ok(precision as u8)
}

/// Precision byte followed by the 7-byte ticker.
pub fn write_symbol(
    out: &mut Vec<u8>,
    type_name: &str,
    precision: u8,
    code: &str,
) -> CodecResult<()> {
    let code = symbol_code_bytes(type_name, code)?;
    out.push(precision);
    out.extend_from_slice(&code);
    Ok(())
}

/// Split `"<amount> <CODE>"` into magnitude, precision and ticker.
pub fn parse_asset(s: &str) -> CodecResult<(i64, u8, &str)> {
    let s = s.trim();
    let (amount, code) = s.split_once(' ').ok_or_else(|| {
        CodecError::format("asset", format!("'{}' is not '<amount> <SYMBOL>'", s))
    })?;
    let code = code.trim();

    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty()
        || !int_part.bytes().all(|c| c.is_ascii_digit())
        || !frac_part.bytes().all(|c| c.is_ascii_digit())
        || (digits.contains('.') && frac_part.is_empty())
    {
        return Err(CodecError::format("asset", format!("invalid amount '{}'", amount)));
    }

    let precision = check_precision("asset", frac_part.len() as u64)?;
    let magnitude_digits = format!("{}{}", int_part, frac_part);
    let significant = magnitude_digits.trim_start_matches('0');
    if significant.len() > 19 {
        return Err(CodecError::range("asset", amount, "amount exceeds 19 digits"));
    }
    let signed = if negative {
        format!("-{}", magnitude_digits)
    } else {
        magnitude_digits
    };
    let magnitude = signed
        .parse::<i64>()
        .map_err(|_| CodecError::range("asset", amount, "amount does not fit in int64"))?;

    Ok((magnitude, precision, code))
}

pub fn write_asset(out: &mut Vec<u8>, s: &str) -> CodecResult<()> {
    let (magnitude, precision, code) = parse_asset(s)?;
    out.extend_from_slice(&magnitude.to_le_bytes());
    write_symbol(out, "asset", precision, code)
}

pub fn encode_asset(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    write_asset(out, expect_str("asset", value)?)
}

/// `"<asset>@<contract>"` or `{"quantity": .., "contract": ..}`.
pub fn encode_extended_asset(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let (quantity, contract) = match value {
        Value::String(s) => s.rsplit_once('@').ok_or_else(|| {
            CodecError::format(
                "extended_asset",
                format!("'{}' is not '<amount> <SYMBOL>@<contract>'", s),
            )
        })?,
        Value::Object(map) => {
            let quantity = map
                .get("quantity")
                .and_then(Value::as_str)
                .ok_or_else(|| CodecError::missing("extended_asset", "quantity"))?;
            let contract = map
                .get("contract")
                .and_then(Value::as_str)
                .ok_or_else(|| CodecError::missing("extended_asset", "contract"))?;
            (quantity, contract)
        }
        other => {
            return Err(CodecError::format(
                "extended_asset",
                format!("expected a string or object, got {}", other),
            ))
        }
    };
    write_asset(out, quantity)?;
    encode_name(out, contract.trim())
}

/// `"<precision>,<CODE>"`.
pub fn encode_symbol(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let s = expect_str("symbol", value)?;
    let (precision, code) = s.split_once(',').ok_or_else(|| {
        CodecError::format("symbol", format!("'{}' is not '<precision>,<CODE>'", s))
    })?;
    let precision = precision
        .trim()
        .parse::<u64>()
        .map_err(|e| CodecError::format("symbol", format!("precision '{}': {}", precision, e)))?;
    let precision = check_precision("symbol", precision)?;
    write_symbol(out, "symbol", precision, code.trim())
}

/// The bare ticker: 7 zero-padded bytes, no precision byte.
pub fn encode_symbol_code_value(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let code = symbol_code_bytes("symbol_code", expect_str("symbol_code", value)?.trim())?;
    out.extend_from_slice(&code);
    Ok(())
}
