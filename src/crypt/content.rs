//! Content keys: payload encryption and key-part splitting for seeders
//!
//! A publisher encrypts the content with a random [`ContentKey`], splits the
//! key into Shamir shares over the ElGamal prime (any `quorum` of them
//! reconstruct it) and encrypts share `i` to seeder `i`'s ElGamal key. The
//! resulting [`KeyParts`] travel in the `submit_content` operation.

use super::elgamal::{ElGamalPrivate, ElGamalPublic, KeyParts, MODULUS};
use crate::error::{Result, SdkError};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::RngCore;
use std::collections::HashSet;
use std::fmt;

/// Length of a content key in bytes.
pub const CONTENT_KEY_SIZE: usize = 32;

const GCM_NONCE_SIZE: usize = 12;

/// Symmetric key protecting one piece of content.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentKey([u8; CONTENT_KEY_SIZE]);

impl ContentKey {
    pub fn generate() -> Self {
        let mut key = [0u8; CONTENT_KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        ContentKey(key)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; CONTENT_KEY_SIZE] = bytes.try_into().map_err(|_| {
            SdkError::CryptoError(format!(
                "Content key must be {} bytes, got {}",
                CONTENT_KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(ContentKey(key))
    }

    pub fn as_bytes(&self) -> &[u8; CONTENT_KEY_SIZE] {
        &self.0
    }

    fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    fn from_biguint(value: &BigUint) -> Result<Self> {
        let bytes = value.to_bytes_be();
        if bytes.len() > CONTENT_KEY_SIZE {
            return Err(SdkError::CryptoError(
                "Recovered value is not a content key".to_string(),
            ));
        }
        let mut key = [0u8; CONTENT_KEY_SIZE];
        key[CONTENT_KEY_SIZE - bytes.len()..].copy_from_slice(&bytes);
        Ok(ContentKey(key))
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ContentKey(<redacted>)")
    }
}

/// Encrypts `content` with AES-256-GCM; output is `nonce || ciphertext`.
pub fn encrypt_content(key: &ContentKey, content: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SdkError::CryptoError(format!("Invalid content key: {}", e)))?;

    let mut nonce = [0u8; GCM_NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), content)
        .map_err(|e| SdkError::CryptoError(format!("Content encryption failed: {}", e)))?;

    let mut output = Vec::with_capacity(GCM_NONCE_SIZE + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Inverse of [`encrypt_content`]. Authentication failures are `DecryptionFailed`.
pub fn decrypt_content(key: &ContentKey, encrypted: &[u8]) -> Result<Vec<u8>> {
    if encrypted.len() < GCM_NONCE_SIZE {
        return Err(SdkError::DecryptionFailed(
            "Encrypted content shorter than its nonce".to_string(),
        ));
    }
    let (nonce, ciphertext) = encrypted.split_at(GCM_NONCE_SIZE);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SdkError::CryptoError(format!("Invalid content key: {}", e)))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| SdkError::DecryptionFailed(e.to_string()))
}

/// RIPEMD-160 fingerprint of the content, as carried in `submit_content.hash`.
pub fn content_hash(content: &[u8]) -> String {
    super::hash(content)
}

/// One Shamir share: the polynomial evaluated at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyShare {
    pub index: u32,
    pub value: BigUint,
}

/// Splits `key` so any `quorum` seeders can rebuild it, encrypting share
/// `i + 1` to `seeders[i]`. The result has one entry per seeder, in order.
pub fn split_content_key(
    key: &ContentKey,
    quorum: u32,
    seeders: &[ElGamalPublic],
) -> Result<Vec<KeyParts>> {
    if quorum == 0 || quorum as usize > seeders.len() {
        return Err(SdkError::InvalidOperation(format!(
            "Quorum {} must be between 1 and the number of seeders ({})",
            quorum,
            seeders.len()
        )));
    }

    let p = &*MODULUS;
    let mut rng = rand::thread_rng();
    let mut coefficients = vec![key.to_biguint()];
    for _ in 1..quorum {
        coefficients.push(rng.gen_biguint_below(p));
    }

    seeders
        .iter()
        .enumerate()
        .map(|(i, seeder)| {
            let share = evaluate(&coefficients, &BigUint::from(i as u64 + 1));
            seeder.encrypt(&share)
        })
        .collect()
}

/// Decrypts the key part a seeder at `position` (0-based) received.
pub fn decrypt_key_part(
    private: &ElGamalPrivate,
    position: usize,
    parts: &KeyParts,
) -> Result<KeyShare> {
    Ok(KeyShare {
        index: position as u32 + 1,
        value: private.decrypt(parts)?,
    })
}

/// Rebuilds a content key from at least `quorum` distinct shares.
///
/// Fewer shares than the quorum yield an unrelated value, not an error.
pub fn recover_content_key(shares: &[KeyShare]) -> Result<ContentKey> {
    if shares.is_empty() {
        return Err(SdkError::CryptoError("No key shares supplied".to_string()));
    }
    let mut seen = HashSet::new();
    for share in shares {
        if share.index == 0 || !seen.insert(share.index) {
            return Err(SdkError::CryptoError(format!(
                "Invalid or duplicate share index {}",
                share.index
            )));
        }
    }

    let p = &*MODULUS;
    let inverse_exponent = p - BigUint::from(2u32);
    let mut secret = BigUint::zero();

    for (i, share_i) in shares.iter().enumerate() {
        let x_i = BigUint::from(share_i.index);
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();
        for (j, share_j) in shares.iter().enumerate() {
            if i == j {
                continue;
            }
            let x_j = BigUint::from(share_j.index);
            numerator = (numerator * &x_j) % p;
            denominator = (denominator * ((&x_j + p - &x_i) % p)) % p;
        }
        let basis = (numerator * denominator.modpow(&inverse_exponent, p)) % p;
        secret = (secret + (&share_i.value % p) * basis) % p;
    }

    ContentKey::from_biguint(&secret)
}

/// Horner evaluation of the sharing polynomial mod p.
fn evaluate(coefficients: &[BigUint], x: &BigUint) -> BigUint {
    let p = &*MODULUS;
    coefficients
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, c| (acc * x + c) % p)
}
