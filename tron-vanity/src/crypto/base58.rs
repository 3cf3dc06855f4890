//! Base58 and Base58Check helpers.

use sha2::{Digest, Sha256};

use super::AddressError;

/// Length of the Base58Check checksum in bytes.
pub const CHECKSUM_LEN: usize = 4;

/// Double SHA-256.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// First four bytes of the double SHA-256 of `payload`.
#[inline]
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = double_sha256(payload);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Plain Base58 encoding (Bitcoin alphabet). Each leading zero byte becomes a leading `1`.
#[inline]
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Plain Base58 decoding.
pub fn decode(encoded: &str) -> Result<Vec<u8>, AddressError> {
    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| AddressError::Base58(e.to_string()))
}

/// Encodes `payload ‖ checksum(payload)`.
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    encode(&data)
}

/// Decodes a Base58Check string and returns the payload with the checksum verified and stripped.
pub fn decode_check(encoded: &str) -> Result<Vec<u8>, AddressError> {
    let mut data = decode(encoded)?;
    if data.len() < CHECKSUM_LEN {
        return Err(AddressError::InvalidLength(data.len()));
    }

    let split = data.len() - CHECKSUM_LEN;
    if data[split..] != checksum(&data[..split]) {
        return Err(AddressError::ChecksumMismatch);
    }

    data.truncate(split);
    Ok(data)
}
