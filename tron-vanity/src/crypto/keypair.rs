//! TRON keypair generation and address derivation.

use rand::RngCore;
use secp256k1::{PublicKey, Secp256k1, SecretKey, SignOnly};
use tiny_keccak::{Hasher, Keccak};

use super::keygen::generate_private_key;
use super::{TronAddress, ACCOUNT_ID_LEN};

/// Errors raised for externally supplied key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("private key is zero or not below the curve order")]
    InvalidSecretKey,
}

/// Derives TRON addresses from private keys.
///
/// Holds a signing-only secp256k1 context so that the hot loop does not rebuild
/// precomputation tables on every attempt.
pub struct AddressDeriver {
    secp: Secp256k1<SignOnly>,
}

impl AddressDeriver {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::signing_only(),
        }
    }

    /// Derives the address for `secret_bytes`.
    ///
    /// Process:
    /// 1. Multiply the base point by the key, serialize uncompressed (65 bytes)
    /// 2. Drop the 0x04 tag and hash the remaining 64 bytes with Keccak-256
    /// 3. Keep the last 20 bytes and prepend the 0x41 version byte
    pub fn derive(&self, secret_bytes: &[u8; 32]) -> Result<TronAddress, KeyError> {
        let secret_key =
            SecretKey::from_slice(secret_bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);
        Ok(address_from_public_key(&public_key))
    }

    /// Derives the Base58Check address string for `secret_bytes`.
    #[inline]
    pub fn derive_base58(&self, secret_bytes: &[u8; 32]) -> Result<String, KeyError> {
        self.derive(secret_bytes).map(|addr| addr.to_base58())
    }
}

impl Default for AddressDeriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Hashes an uncompressed public key into a TRON address.
#[inline]
pub fn address_from_public_key(public_key: &PublicKey) -> TronAddress {
    let public_key_bytes = public_key.serialize_uncompressed();

    let mut hasher = Keccak::v256();
    hasher.update(&public_key_bytes[1..]);
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);

    let mut account_id = [0u8; ACCOUNT_ID_LEN];
    account_id.copy_from_slice(&hash[32 - ACCOUNT_ID_LEN..]);
    TronAddress::from_account_id(account_id)
}

/// A TRON keypair (private key + derived address).
#[derive(Debug, Clone)]
pub struct Keypair {
    secret_key: [u8; 32],
    address: TronAddress,
}

impl Keypair {
    /// Generates a keypair from the given deriver and entropy source.
    pub fn generate_with<R: RngCore + ?Sized>(deriver: &AddressDeriver, rng: &mut R) -> Self {
        let secret_key = generate_private_key(rng);
        let address = deriver
            .derive(&secret_key)
            .unwrap_or_else(|_| unreachable!("generate_private_key returns valid scalars"));
        Self {
            secret_key,
            address,
        }
    }

    /// Builds a keypair from an existing secret key.
    pub fn from_secret_key(secret_bytes: [u8; 32]) -> Result<Self, KeyError> {
        let address = AddressDeriver::new().derive(&secret_bytes)?;
        Ok(Self {
            secret_key: secret_bytes,
            address,
        })
    }

    /// Returns the private key as a hex string (without 0x prefix).
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }

    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.secret_key
    }

    #[inline]
    pub fn address(&self) -> &TronAddress {
        &self.address
    }
}
