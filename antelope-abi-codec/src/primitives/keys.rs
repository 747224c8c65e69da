//! `public_key` and `signature`: base58 armor with a ripemd160 checksum.
//!
//! Accepted public key forms are the legacy `EOS…` string and the
//! `PUB_K1_`, `PUB_R1_`, `PUB_WA_` strings. Anything else is a `Format`
//! error; there is no unchecked passthrough.

use antelope_abi_core::error::{CodecError, CodecResult};
use base58::{FromBase58, ToBase58};
use ripemd::{Digest, Ripemd160};
use serde_json::Value;

use super::expect_str;
use crate::hex::hex_encode;

const CHECKSUM_LEN: usize = 4;
const POINT_LEN: usize = 33;
const COMPACT_SIGNATURE_LEN: usize = 65;
const LEGACY_PREFIX: &str = "EOS";

/// Curve tag written in front of key and signature bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    K1 = 0,
    R1 = 1,
    WA = 2,
}

impl KeyType {
    pub fn suffix(&self) -> &'static str {
        match self {
            KeyType::K1 => "K1",
            KeyType::R1 => "R1",
            KeyType::WA => "WA",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "K1" => Some(KeyType::K1),
            "R1" => Some(KeyType::R1),
            "WA" => Some(KeyType::WA),
            _ => None,
        }
    }
}

fn ripemd160_checksum(data: &[u8], suffix: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.update(suffix);
    let digest = hasher.finalize();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Strip base58 armor and verify the trailing 4-byte checksum.
fn decode_checked(kind: &str, encoded: &str, suffix: &[u8]) -> CodecResult<Vec<u8>> {
    let raw = encoded
        .from_base58()
        .map_err(|e| CodecError::format(kind, format!("invalid base58: {:?}", e)))?;
    if raw.len() <= CHECKSUM_LEN {
        return Err(CodecError::format(kind, "encoded data is too short"));
    }
    let (data, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    let expected = ripemd160_checksum(data, suffix);
    if checksum != expected.as_slice() {
        return Err(CodecError::ChecksumMismatch {
            kind: kind.to_string(),
            expected: hex_encode(&expected),
            actual: hex_encode(checksum),
        });
    }
    Ok(data.to_vec())
}

/// Split `PUB_K1_xxx` / `SIG_R1_xxx` into its key type and base58 body.
fn split_prefixed<'a>(kind: &str, s: &'a str, prefix: &str) -> CodecResult<(KeyType, &'a str)> {
    let rest = s
        .strip_prefix(prefix)
        .ok_or_else(|| CodecError::format(kind, format!("'{}' has no {} prefix", s, prefix)))?;
    let (suffix, body) = rest
        .split_once('_')
        .ok_or_else(|| CodecError::format(kind, format!("'{}' has no key type", s)))?;
    let key_type = KeyType::from_suffix(suffix)
        .ok_or_else(|| CodecError::format(kind, format!("unsupported key type '{}'", suffix)))?;
    Ok((key_type, body))
}

/// Decode a public key string into its tag and key data.
pub fn parse_public_key(s: &str) -> CodecResult<(KeyType, Vec<u8>)> {
    let s = s.trim();
    if let Some(body) = s.strip_prefix(LEGACY_PREFIX) {
        let point = decode_checked("public_key", body, b"")?;
        if point.len() != POINT_LEN {
            return Err(CodecError::format(
                "public_key",
                format!("legacy key must carry {} bytes, got {}", POINT_LEN, point.len()),
            ));
        }
        return Ok((KeyType::K1, point));
    }

    let (key_type, body) = split_prefixed("public_key", s, "PUB_")?;
    let data = decode_checked("public_key", body, key_type.suffix().as_bytes())?;
    let length_ok = match key_type {
        KeyType::K1 | KeyType::R1 => data.len() == POINT_LEN,
        KeyType::WA => data.len() > POINT_LEN,
    };
    if !length_ok {
        return Err(CodecError::format(
            "public_key",
            format!("{} key has unexpected length {}", key_type.suffix(), data.len()),
        ));
    }
    Ok((key_type, data))
}

/// Decode a `SIG_*` string into its tag and signature bytes.
pub fn parse_signature(s: &str) -> CodecResult<(KeyType, Vec<u8>)> {
    let (key_type, body) = split_prefixed("signature", s.trim(), "SIG_")?;
    let data = decode_checked("signature", body, key_type.suffix().as_bytes())?;
    let length_ok = match key_type {
        KeyType::K1 | KeyType::R1 => data.len() == COMPACT_SIGNATURE_LEN,
        KeyType::WA => data.len() > COMPACT_SIGNATURE_LEN,
    };
    if !length_ok {
        return Err(CodecError::format(
            "signature",
            format!("{} signature has unexpected length {}", key_type.suffix(), data.len()),
        ));
    }
    Ok((key_type, data))
}

pub fn encode_public_key_value(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let (key_type, data) = parse_public_key(expect_str("public_key", value)?)?;
    out.push(key_type as u8);
    out.extend_from_slice(&data);
    Ok(())
}

pub fn encode_signature_value(out: &mut Vec<u8>, value: &Value) -> CodecResult<()> {
    let (key_type, data) = parse_signature(expect_str("signature", value)?)?;
    out.push(key_type as u8);
    out.extend_from_slice(&data);
    Ok(())
}

/// Armor raw key data as `PUB_<type>_<base58>`.
pub fn public_key_to_string(key_type: KeyType, data: &[u8]) -> String {
    armor("PUB_", key_type, data)
}

/// Armor raw signature data as `SIG_<type>_<base58>`.
pub fn signature_to_string(key_type: KeyType, data: &[u8]) -> String {
    armor("SIG_", key_type, data)
}

/// Armor a K1 point in the legacy `EOS…` form.
pub fn legacy_public_key_to_string(point: &[u8]) -> String {
    let mut raw = point.to_vec();
    raw.extend_from_slice(&ripemd160_checksum(point, b""));
    format!("{}{}", LEGACY_PREFIX, raw.to_base58())
}

fn armor(prefix: &str, key_type: KeyType, data: &[u8]) -> String {
    let mut raw = data.to_vec();
    raw.extend_from_slice(&ripemd160_checksum(data, key_type.suffix().as_bytes()));
    format!("{}{}_{}", prefix, key_type.suffix(), raw.to_base58())
}
