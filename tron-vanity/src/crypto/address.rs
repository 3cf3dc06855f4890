//! TRON address representation and utilities.

use std::fmt;
use std::str::FromStr;

use super::base58;

/// Version byte of TRON mainnet addresses. Makes every address start with `T`.
pub const ADDRESS_VERSION: u8 = 0x41;

/// Length of the account identifier taken from the Keccak-256 hash.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Length of the Base58 form of an address.
pub const ADDRESS_STR_LEN: usize = 34;

/// Errors produced when parsing an address string.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("invalid decoded length: {0} bytes")]
    InvalidLength(usize),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("unexpected version byte 0x{0:02x}")]
    InvalidVersion(u8),
}

/// A TRON address: the version byte followed by the 20-byte account id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TronAddress([u8; ACCOUNT_ID_LEN + 1]);

impl TronAddress {
    /// Builds an address from a 20-byte account id.
    #[inline]
    pub fn from_account_id(account_id: [u8; ACCOUNT_ID_LEN]) -> Self {
        let mut payload = [0u8; ACCOUNT_ID_LEN + 1];
        payload[0] = ADDRESS_VERSION;
        payload[1..].copy_from_slice(&account_id);
        Self(payload)
    }

    /// Parses and validates a Base58Check address string.
    pub fn from_base58(encoded: &str) -> Result<Self, AddressError> {
        let payload = base58::decode_check(encoded)?;
        let payload: [u8; ACCOUNT_ID_LEN + 1] = payload
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(payload.len() + base58::CHECKSUM_LEN))?;

        if payload[0] != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(payload[0]));
        }

        Ok(Self(payload))
    }

    /// The 20-byte account id without the version byte.
    pub fn account_id(&self) -> &[u8] {
        &self.0[1..]
    }

    /// Returns the payload as lowercase hex (`41...`), the form used by TRON node APIs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the Base58Check form (`T...`).
    #[inline]
    pub fn to_base58(&self) -> String {
        base58::encode_check(&self.0)
    }
}

impl FromStr for TronAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Debug for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TronAddress({})", self.to_base58())
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(hex_str: &str) -> [u8; ACCOUNT_ID_LEN] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_known_encoding() {
        let addr = TronAddress::from_account_id(account("7e5f4552091a69125d5dfcb7b8c2659029395bdf"));
        assert_eq!(addr.to_base58(), "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC");
        assert_eq!(addr.to_hex(), "417e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_parse_round_trip() {
        let parsed: TronAddress = "TDvSsdrNM5eeXNL3czpa6AxLDHZA9nwe9K".parse().unwrap();
        assert_eq!(
            hex::encode(parsed.account_id()),
            "2b5ad5c4795c026514f8317c7a215e218dccd6cf"
        );
        assert_eq!(parsed.to_string(), "TDvSsdrNM5eeXNL3czpa6AxLDHZA9nwe9K");
    }

    #[test]
    fn test_encoded_length_is_fixed() {
        for id in [[0u8; ACCOUNT_ID_LEN], [0xffu8; ACCOUNT_ID_LEN]] {
            let encoded = TronAddress::from_account_id(id).to_base58();
            assert_eq!(encoded.len(), ADDRESS_STR_LEN);
            assert!(encoded.starts_with('T'));
        }
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // last character altered
        let err = TronAddress::from_base58("TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HD").unwrap_err();
        assert!(matches!(err, AddressError::ChecksumMismatch));
    }

    #[test]
    fn test_rejects_wrong_version() {
        let mut payload = vec![0x00u8];
        payload.extend_from_slice(&[7u8; ACCOUNT_ID_LEN]);
        let encoded = base58::encode_check(&payload);
        assert!(matches!(
            TronAddress::from_base58(&encoded),
            Err(AddressError::InvalidVersion(0x00))
        ));
    }

    #[test]
    fn test_rejects_short_payload() {
        let encoded = base58::encode_check(&[ADDRESS_VERSION, 1, 2, 3]);
        assert!(matches!(
            TronAddress::from_base58(&encoded),
            Err(AddressError::InvalidLength(8))
        ));
    }
}
