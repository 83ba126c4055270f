use crate::foundation::{MintError, Result, ADDRESS_SIZE, HASH_SIZE};

/// Strips an optional `0x`/`0X` prefix and surrounding whitespace.
pub fn strip_hex_prefix(s: &str) -> &str {
    let trimmed = s.trim();
    trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed)
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(strip_hex_prefix(s)).map_err(|e| e.into())
}

/// Parses a 32-byte identifier from hex, with or without `0x`.
///
/// Wrong-width input is an `InvalidInput`: the width is part of the contract,
/// not an encoding detail.
pub fn parse_hex_32bytes(s: &str) -> Result<[u8; HASH_SIZE]> {
    let bytes = decode_hex(s)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| MintError::invalid_input(format!("expected {}-byte hex, got {} bytes", HASH_SIZE, bytes.len())))
}

/// Parses a 20-byte chain address from hex, with or without `0x`.
pub fn parse_hex_20bytes(s: &str) -> Result<[u8; ADDRESS_SIZE]> {
    let bytes = decode_hex(s)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| MintError::invalid_input(format!("expected {}-byte hex address, got {} bytes", ADDRESS_SIZE, bytes.len())))
}
