//! Checksummed memo encryption between two account keys
//!
//! The key schedule follows the network's memo format so that peers can
//! decrypt what this crate produces:
//!
//! ```text
//! S    = sha512(x(sender_private * recipient_public))
//! h    = sha512(nonce || hex(S))
//! key  = h[0..32], iv = h[32..48]
//! data = AES-256-CBC/PKCS7(sha256(message)[0..4] || message)
//! ```

use crate::crypto::{PrivateKey, PublicKey};
use crate::error::{Result, SdkError};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256, Sha512};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Nonce used when the caller supplies none.
///
/// Kept at zero for compatibility with existing peers; a fixed nonce makes
/// every memo between the same two keys share one AES key and IV. Pass
/// [`crate::crypt::generate_nonce`] when secrecy matters.
pub const DEFAULT_NONCE: &str = "0";

const CHECKSUM_SIZE: usize = 4;

/// ECDH shared secret: SHA-512 of the x coordinate of `private * public`.
pub fn shared_secret(private_key: &PrivateKey, public_key: &PublicKey) -> [u8; 64] {
    let point = secp256k1::ecdh::shared_secret_point(public_key.inner(), private_key.secret());
    let mut secret = [0u8; 64];
    secret.copy_from_slice(&Sha512::digest(&point[..32]));
    secret
}

fn key_and_iv(
    private_key: &PrivateKey,
    public_key: &PublicKey,
    nonce: Option<&str>,
) -> ([u8; 32], [u8; 16]) {
    let secret = shared_secret(private_key, public_key);
    let mut seed = nonce.unwrap_or(DEFAULT_NONCE).as_bytes().to_vec();
    seed.extend_from_slice(hex::encode(secret).as_bytes());
    let digest = Sha512::digest(&seed);

    let mut key = [0u8; 32];
    let mut iv = [0u8; 16];
    key.copy_from_slice(&digest[..32]);
    iv.copy_from_slice(&digest[32..48]);
    (key, iv)
}

/// Encrypts `message` for `recipient_public`, prefixing a 4-byte checksum of
/// the plaintext so tampering or a wrong key is detected on decrypt.
pub fn encrypt_with_checksum(
    message: impl AsRef<[u8]>,
    sender_private: &PrivateKey,
    recipient_public: &PublicKey,
    nonce: Option<&str>,
) -> Result<Vec<u8>> {
    let message = message.as_ref();
    let (key, iv) = key_and_iv(sender_private, recipient_public, nonce);

    let mut payload = Vec::with_capacity(CHECKSUM_SIZE + message.len());
    payload.extend_from_slice(&Sha256::digest(message)[..CHECKSUM_SIZE]);
    payload.extend_from_slice(message);

    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| SdkError::CryptoError(format!("Invalid AES key material: {}", e)))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(&payload))
}

/// Inverse of [`encrypt_with_checksum`].
///
/// Fails closed: a padding error is `DecryptionFailed`, a checksum that does
/// not match the recovered plaintext is `ChecksumMismatch`.
pub fn decrypt_with_checksum(
    ciphertext: &[u8],
    recipient_private: &PrivateKey,
    sender_public: &PublicKey,
    nonce: Option<&str>,
) -> Result<Vec<u8>> {
    let (key, iv) = key_and_iv(recipient_private, sender_public, nonce);

    let cipher = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|e| SdkError::CryptoError(format!("Invalid AES key material: {}", e)))?;
    let payload = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|e| SdkError::DecryptionFailed(e.to_string()))?;

    if payload.len() < CHECKSUM_SIZE {
        return Err(SdkError::DecryptionFailed(format!(
            "Payload of {} bytes is shorter than its checksum",
            payload.len()
        )));
    }

    let (checksum, plaintext) = payload.split_at(CHECKSUM_SIZE);
    if Sha256::digest(plaintext)[..CHECKSUM_SIZE] != *checksum {
        return Err(SdkError::ChecksumMismatch);
    }

    Ok(plaintext.to_vec())
}
