//! `time_point`, `time_point_sec` and `block_timestamp_type`.
//!
//! String inputs are ISO-8601, taken as UTC when no zone is given (chain
//! nodes emit `2021-03-11T07:24:20.500` without a suffix). Numeric inputs
//! are the raw wire unit of each type.

use antelope_abi_core::error::{CodecError, CodecResult};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::number::{parse_signed, parse_unsigned};

/// 2000-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;
pub const BLOCK_INTERVAL_MS: i64 = 500;

/// Parse an ISO-8601 timestamp into microseconds since the Unix epoch.
pub fn parse_timestamp_micros(type_name: &str, s: &str) -> CodecResult<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_micros());
    }
    let naive = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.and_utc().timestamp_micros())
        .map_err(|e| CodecError::format(type_name, format!("'{}': {}", s, e)))
}

/// Milliseconds since the Unix epoch, as the envelope builder needs for expiration.
pub fn parse_timestamp_millis(type_name: &str, s: &str) -> CodecResult<i64> {
    parse_timestamp_micros(type_name, s).map(|us| us.div_euclid(1000))
}

pub fn encode_time_point(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let micros = match value {
        Value::String(s) if !looks_numeric(s) => parse_timestamp_micros("time_point", s)?,
        _ => {
            let v = parse_signed("time_point", value)?;
            i64::try_from(v).map_err(|_| CodecError::range("time_point", v, "must fit in int64"))?
        }
    };
    out.extend_from_slice(&micros.to_le_bytes());
    Ok(())
}

pub fn encode_time_point_sec(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let secs: i128 = match value {
        Value::String(s) if !looks_numeric(s) => {
            parse_timestamp_micros("time_point_sec", s)?.div_euclid(1_000_000) as i128
        }
        _ => parse_unsigned("time_point_sec", value)? as i128,
    };
    let secs = u32::try_from(secs)
        .map_err(|_| CodecError::range("time_point_sec", secs, "must fit in uint32"))?;
    out.extend_from_slice(&secs.to_le_bytes());
    Ok(())
}

/// Half-second slots since 2000-01-01T00:00:00Z.
pub fn encode_block_timestamp(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let slot: i128 = match value {
        Value::String(s) if !looks_numeric(s) => {
            let ms = parse_timestamp_millis("block_timestamp_type", s)?;
            (ms - BLOCK_TIMESTAMP_EPOCH_MS).div_euclid(BLOCK_INTERVAL_MS) as i128
        }
        _ => parse_unsigned("block_timestamp_type", value)? as i128,
    };
    let slot = u32::try_from(slot).map_err(|_| {
        CodecError::range("block_timestamp_type", slot, "must be within [2000-01-01, 2068-02-07]")
    })?;
    out.extend_from_slice(&slot.to_le_bytes());
    Ok(())
}

fn looks_numeric(s: &str) -> bool {
    let s = s.trim();
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit())
}
