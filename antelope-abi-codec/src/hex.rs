//! Hex encoding/decoding utilities.

use antelope_abi_core::error::CodecError;
use antelope_abi_core::validation::validate_hex;

pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex, reporting failures as a `Format` error against `type_name`.
pub fn hex_decode(type_name: &str, input: &str) -> Result<Vec<u8>, CodecError> {
    validate_hex(type_name, input)?;
    hex::decode(input).map_err(|e| CodecError::format(type_name, e.to_string()))
}

/// Decode a fixed-size value from hex, e.g. a 32-byte chain id.
pub fn decode_fixed<const N: usize>(type_name: &str, input: &str) -> Result<[u8; N], CodecError> {
    let bytes = hex_decode(type_name, input)?;
    if bytes.len() != N {
        return Err(CodecError::format(
            type_name,
            format!("expected {} bytes, got {}", N, bytes.len()),
        ));
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}
