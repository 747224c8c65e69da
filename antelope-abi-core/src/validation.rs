//! Validation helpers run before any chain read.

use crate::config::TransactionConfig;
use crate::error::CodecError;

/// Largest value `max_net_usage_words` and `delay_sec` can carry as varuint32.
pub const MAX_VARUINT32: u64 = u32::MAX as u64;

/// Largest value `max_cpu_usage_ms` can carry as uint8.
pub const MAX_CPU_USAGE_MS: u64 = u8::MAX as u64;

/// Check every configuration bound.
///
/// Called by the envelope builder before it reads chain info, so a bad
/// configuration never costs a round-trip.
pub fn validate_transaction_config(config: &TransactionConfig) -> Result<(), CodecError> {
    if config.max_net_usage_words > MAX_VARUINT32 {
        return Err(CodecError::range(
            "max_net_usage_words",
            config.max_net_usage_words,
            "must be at most 2^32-1",
        ));
    }
    if config.max_cpu_usage_ms > MAX_CPU_USAGE_MS {
        return Err(CodecError::range(
            "max_cpu_usage_ms",
            config.max_cpu_usage_ms,
            "must be at most 255",
        ));
    }
    if config.delay_sec > MAX_VARUINT32 {
        return Err(CodecError::range(
            "delay_sec",
            config.delay_sec,
            "must be at most 2^32-1",
        ));
    }
    Ok(())
}

/// Check that a string is even-length hex (either case).
pub fn validate_hex(type_name: &str, value: &str) -> Result<(), CodecError> {
    if value.len() % 2 != 0 {
        return Err(CodecError::format(
            type_name,
            format!("hex string has odd length: {}", value.len()),
        ));
    }
    if let Some(pos) = value.find(|c: char| !c.is_ascii_hexdigit()) {
        return Err(CodecError::format(
            type_name,
            format!("invalid hex character at position {}", pos),
        ));
    }
    Ok(())
}
