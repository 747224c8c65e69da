//! Primitive codec table: one encoder per native Antelope wire type.
//!
//! Every encoder is a pure function of its input value. Fixed-width
//! encoders reject out-of-range input with a `Range` error instead of
//! truncating it. Multi-byte values are little-endian.

use std::fmt;

use antelope_abi_core::error::CodecResult;
use serde_json::Value;

pub mod asset;
pub mod bytes;
pub mod keys;
pub mod name;
pub mod number;
pub mod time;

/// Native wire types known to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    VarUint32,
    VarInt32,
    Float32,
    Float64,
    Float128,
    Name,
    Asset,
    ExtendedAsset,
    Symbol,
    SymbolCode,
    Checksum160,
    Checksum256,
    Checksum512,
    TimePoint,
    TimePointSec,
    BlockTimestampType,
    Bytes,
    String,
    PublicKey,
    Signature,
}

const ALL: [PrimitiveKind; 31] = [
    PrimitiveKind::Bool,
    PrimitiveKind::Int8,
    PrimitiveKind::Int16,
    PrimitiveKind::Int32,
    PrimitiveKind::Int64,
    PrimitiveKind::Int128,
    PrimitiveKind::Uint8,
    PrimitiveKind::Uint16,
    PrimitiveKind::Uint32,
    PrimitiveKind::Uint64,
    PrimitiveKind::Uint128,
    PrimitiveKind::VarUint32,
    PrimitiveKind::VarInt32,
    PrimitiveKind::Float32,
    PrimitiveKind::Float64,
    PrimitiveKind::Float128,
    PrimitiveKind::Name,
    PrimitiveKind::Asset,
    PrimitiveKind::ExtendedAsset,
    PrimitiveKind::Symbol,
    PrimitiveKind::SymbolCode,
    PrimitiveKind::Checksum160,
    PrimitiveKind::Checksum256,
    PrimitiveKind::Checksum512,
    PrimitiveKind::TimePoint,
    PrimitiveKind::TimePointSec,
    PrimitiveKind::BlockTimestampType,
    PrimitiveKind::Bytes,
    PrimitiveKind::String,
    PrimitiveKind::PublicKey,
    PrimitiveKind::Signature,
];

impl PrimitiveKind {
    /// Look up a primitive by its ABI type name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|k| k.as_str() == name)
    }

    pub fn all() -> &'static [PrimitiveKind] {
        &ALL
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Int128 => "int128",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Uint128 => "uint128",
            PrimitiveKind::VarUint32 => "varuint32",
            PrimitiveKind::VarInt32 => "varint32",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::Float128 => "float128",
            PrimitiveKind::Name => "name",
            PrimitiveKind::Asset => "asset",
            PrimitiveKind::ExtendedAsset => "extended_asset",
            PrimitiveKind::Symbol => "symbol",
            PrimitiveKind::SymbolCode => "symbol_code",
            PrimitiveKind::Checksum160 => "checksum160",
            PrimitiveKind::Checksum256 => "checksum256",
            PrimitiveKind::Checksum512 => "checksum512",
            PrimitiveKind::TimePoint => "time_point",
            PrimitiveKind::TimePointSec => "time_point_sec",
            PrimitiveKind::BlockTimestampType => "block_timestamp_type",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::String => "string",
            PrimitiveKind::PublicKey => "public_key",
            PrimitiveKind::Signature => "signature",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode `value` as `kind`, appending the wire bytes to `out`.
pub fn encode_into(kind: PrimitiveKind, value: &Value, out: &mut Vec<u8>) -> CodecResult<()> {
    use number::{encode_signed, encode_unsigned};

    match kind {
        PrimitiveKind::Bool => out.push(number::parse_bool(value)? as u8),
        PrimitiveKind::Int8 => encode_signed(out, "int8", 8, value)?,
        PrimitiveKind::Int16 => encode_signed(out, "int16", 16, value)?,
        PrimitiveKind::Int32 => encode_signed(out, "int32", 32, value)?,
        PrimitiveKind::Int64 => encode_signed(out, "int64", 64, value)?,
        PrimitiveKind::Int128 => encode_signed(out, "int128", 128, value)?,
        PrimitiveKind::Uint8 => encode_unsigned(out, "uint8", 8, value)?,
        PrimitiveKind::Uint16 => encode_unsigned(out, "uint16", 16, value)?,
        PrimitiveKind::Uint32 => encode_unsigned(out, "uint32", 32, value)?,
        PrimitiveKind::Uint64 => encode_unsigned(out, "uint64", 64, value)?,
        PrimitiveKind::Uint128 => encode_unsigned(out, "uint128", 128, value)?,
        PrimitiveKind::VarUint32 => {
            let v = number::parse_u32("varuint32", value)?;
            number::write_varuint32(out, v);
        }
        PrimitiveKind::VarInt32 => {
            let v = number::parse_i32("varint32", value)?;
            number::write_varint32(out, v);
        }
        PrimitiveKind::Float32 => number::encode_float32(out, value)?,
        PrimitiveKind::Float64 => number::encode_float64(out, value)?,
        PrimitiveKind::Float128 => bytes::encode_float128(out, value)?,
        PrimitiveKind::Name => name::encode_name_value(out, value)?,
        PrimitiveKind::Asset => asset::encode_asset(out, value)?,
        PrimitiveKind::ExtendedAsset => asset::encode_extended_asset(out, value)?,
        PrimitiveKind::Symbol => asset::encode_symbol(out, value)?,
        PrimitiveKind::SymbolCode => asset::encode_symbol_code_value(out, value)?,
        PrimitiveKind::Checksum160 => bytes::encode_checksum(out, "checksum160", 20, value)?,
        PrimitiveKind::Checksum256 => bytes::encode_checksum(out, "checksum256", 32, value)?,
        PrimitiveKind::Checksum512 => bytes::encode_checksum(out, "checksum512", 64, value)?,
        PrimitiveKind::TimePoint => time::encode_time_point(out, value)?,
        PrimitiveKind::TimePointSec => time::encode_time_point_sec(out, value)?,
        PrimitiveKind::BlockTimestampType => time::encode_block_timestamp(out, value)?,
        PrimitiveKind::Bytes => bytes::encode_bytes(out, value)?,
        PrimitiveKind::String => bytes::encode_string(out, value)?,
        PrimitiveKind::PublicKey => keys::encode_public_key_value(out, value)?,
        PrimitiveKind::Signature => keys::encode_signature_value(out, value)?,
    }
    Ok(())
}

/// Encode `value` as `kind` into a fresh buffer.
pub fn encode(kind: PrimitiveKind, value: &Value) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(kind, value, &mut out)?;
    Ok(out)
}

/// Encode `value` as `kind` and return lowercase hex.
pub fn encode_hex(kind: PrimitiveKind, value: &Value) -> CodecResult<String> {
    encode(kind, value).map(|b| crate::hex::hex_encode(&b))
}

/// Borrow `value` as a string or fail with a `Format` error naming `type_name`.
pub(crate) fn expect_str<'a>(type_name: &str, value: &'a Value) -> CodecResult<&'a str> {
    value.as_str().ok_or_else(|| {
        antelope_abi_core::error::CodecError::format(
            type_name,
            format!("expected a string, got {}", value),
        )
    })
}
