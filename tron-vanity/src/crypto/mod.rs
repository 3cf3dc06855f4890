//! Cryptographic operations for TRON key and address generation.
//!
//! This module provides:
//! - Rejection-sampled secp256k1 private keys
//! - TRON address derivation (Keccak-256 + Base58Check)
//! - Keypair management

pub mod base58;
mod address;
mod keygen;
mod keypair;

pub use address::{AddressError, TronAddress, ACCOUNT_ID_LEN, ADDRESS_STR_LEN, ADDRESS_VERSION};
pub use keygen::{generate_private_key, is_valid_scalar, CURVE_ORDER};
pub use keypair::{address_from_public_key, AddressDeriver, KeyError, Keypair};
