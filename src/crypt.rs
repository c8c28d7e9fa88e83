//! Hashing, memo encryption and content-key cryptography
//!
//! - [`cipher`] - checksummed memo encryption between two account keys
//! - [`elgamal`] - ElGamal keys used to encrypt content-key shares
//! - [`content`] - content keys, payload encryption and key-part splitting

pub mod cipher;
pub mod content;
pub mod elgamal;

pub use cipher::{decrypt_with_checksum, encrypt_with_checksum, shared_secret, DEFAULT_NONCE};
pub use elgamal::{derive_elgamal_private, derive_elgamal_public, ElGamalPrivate, ElGamalPublic};

use rand::Rng;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// RIPEMD-160 fingerprint of `data`, as lowercase hex.
pub fn hash(data: impl AsRef<[u8]>) -> String {
    hex::encode(Ripemd160::digest(data.as_ref()))
}

/// SHA-256 of `data`, as lowercase hex.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(data.as_ref()))
}

/// A random memo nonce (decimal u64).
pub fn generate_nonce() -> String {
    rand::thread_rng().gen::<u64>().to_string()
}
