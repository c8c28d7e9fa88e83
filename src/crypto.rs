//! Account key material: WIF private keys, prefixed public keys and ECDSA signatures

use crate::error::{Result, SdkError};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use ripemd::Ripemd160;
use secp256k1::{
    constants::{COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa, All, Message, Secp256k1, SecretKey,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Version byte prepended to the secret in the WIF encoding.
pub const WIF_VERSION: u8 = 0x80;

/// Prefix of public key strings on the main network.
pub const DEFAULT_ADDRESS_PREFIX: &str = "DCT";

const CHECKSUM_SIZE: usize = 4;

fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// A private (signing) key.
///
/// The raw secret is only reachable through [`PrivateKey::raw`] and leaves
/// the process as WIF via [`PrivateKey::string_key`]. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Generates a new random key using the OS random number generator.
    pub fn generate() -> Self {
        PrivateKey {
            secret: SecretKey::new(&mut OsRng),
        }
    }

    /// Creates a key from 32 raw secret bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(SdkError::InvalidKeyFormat(format!(
                "Secret key must be {} bytes, got {}",
                SECRET_KEY_SIZE,
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| SdkError::InvalidKeyFormat(format!("Invalid secret key bytes: {}", e)))?;
        Ok(PrivateKey { secret })
    }

    /// Decodes a base58-check WIF string (version `0x80`, uncompressed form).
    pub fn from_wif(wif: &str) -> Result<Self> {
        let decoded = bs58::decode(wif.trim())
            .into_vec()
            .map_err(|e| SdkError::InvalidKeyFormat(format!("Invalid base58: {}", e)))?;

        if decoded.len() != 1 + SECRET_KEY_SIZE + CHECKSUM_SIZE {
            return Err(SdkError::InvalidKeyFormat(format!(
                "WIF payload must be {} bytes, got {}",
                1 + SECRET_KEY_SIZE + CHECKSUM_SIZE,
                decoded.len()
            )));
        }

        let (payload, checksum) = decoded.split_at(1 + SECRET_KEY_SIZE);
        if payload[0] != WIF_VERSION {
            return Err(SdkError::InvalidKeyFormat(format!(
                "Expected version byte 0x{:02x}, got 0x{:02x}",
                WIF_VERSION, payload[0]
            )));
        }
        if double_sha256(payload)[..CHECKSUM_SIZE] != *checksum {
            return Err(SdkError::InvalidKeyFormat("WIF checksum mismatch".to_string()));
        }

        Self::from_bytes(&payload[1..])
    }

    /// Derives a key from an arbitrary seed string (`sha256(seed)`).
    pub fn from_seed(seed: &str) -> Result<Self> {
        Self::from_bytes(&Sha256::digest(seed.as_bytes()))
    }

    /// Derives the key at `sequence` for a brain key phrase.
    ///
    /// `sha256(sha512(normalized_brain_key + " " + sequence))`
    pub fn from_brain_key(brain_key: &str, sequence: u32) -> Result<Self> {
        let normalized = normalize_brain_key(brain_key);
        let seed = format!("{} {}", normalized, sequence);
        let digest = Sha256::digest(Sha512::digest(seed.as_bytes()));
        Self::from_bytes(&digest)
    }

    /// The raw 32-byte secret.
    pub fn raw(&self) -> [u8; SECRET_KEY_SIZE] {
        self.secret.secret_bytes()
    }

    /// Canonical WIF string for this key.
    pub fn string_key(&self) -> String {
        let mut payload = Vec::with_capacity(1 + SECRET_KEY_SIZE + CHECKSUM_SIZE);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.secret.secret_bytes());
        let checksum = double_sha256(&payload);
        payload.extend_from_slice(&checksum[..CHECKSUM_SIZE]);
        bs58::encode(payload).into_string()
    }

    /// Derives the matching public key.
    pub fn to_public(&self) -> PublicKey {
        PublicKey {
            key: secp256k1::PublicKey::from_secret_key(&SECP256K1_CONTEXT, &self.secret),
        }
    }

    /// Signs a message (hashed with SHA-256 first) and returns the compact signature.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let digest = Sha256::digest(message);
        let message = Message::from_digest_slice(&digest)
            .map_err(|e| SdkError::CryptoError(format!("Failed to create message: {}", e)))?;
        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret);
        Ok(Signature(signature.serialize_compact()))
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl FromStr for PrivateKey {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_wif(s)
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn normalize_brain_key(brain_key: &str) -> String {
    brain_key.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key: secp256k1::PublicKey,
}

impl PublicKey {
    /// Parses a public key string carrying the default `DCT` prefix.
    pub fn from_string(text: &str) -> Result<Self> {
        Self::from_string_with_prefix(text, DEFAULT_ADDRESS_PREFIX)
    }

    /// Parses `<prefix><base58(key || ripemd160(key)[..4])>`.
    pub fn from_string_with_prefix(text: &str, prefix: &str) -> Result<Self> {
        let encoded = text.trim().strip_prefix(prefix).ok_or_else(|| {
            SdkError::InvalidKeyFormat(format!("Public key must start with {}", prefix))
        })?;

        let decoded = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| SdkError::InvalidKeyFormat(format!("Invalid base58: {}", e)))?;
        if decoded.len() != PUBLIC_KEY_SIZE + CHECKSUM_SIZE {
            return Err(SdkError::InvalidKeyFormat(format!(
                "Public key payload must be {} bytes, got {}",
                PUBLIC_KEY_SIZE + CHECKSUM_SIZE,
                decoded.len()
            )));
        }

        let (key_bytes, checksum) = decoded.split_at(PUBLIC_KEY_SIZE);
        if Ripemd160::digest(key_bytes)[..CHECKSUM_SIZE] != *checksum {
            return Err(SdkError::InvalidKeyFormat(
                "Public key checksum mismatch".to_string(),
            ));
        }

        Self::from_bytes(key_bytes)
    }

    /// Parses a 33-byte compressed public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(SdkError::InvalidKeyFormat(format!(
                "Public key must be exactly {} bytes (compressed), got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            )));
        }
        let key = secp256k1::PublicKey::from_slice(bytes)
            .map_err(|e| SdkError::InvalidKeyFormat(format!("Invalid public key: {}", e)))?;
        Ok(PublicKey { key })
    }

    /// The compressed 33-byte point.
    pub fn raw(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.key.serialize()
    }

    /// Canonical string with the default prefix.
    pub fn string_key(&self) -> String {
        self.to_string_with_prefix(DEFAULT_ADDRESS_PREFIX)
    }

    pub fn to_string_with_prefix(&self, prefix: &str) -> String {
        let key_bytes = self.key.serialize();
        let mut payload = Vec::with_capacity(PUBLIC_KEY_SIZE + CHECKSUM_SIZE);
        payload.extend_from_slice(&key_bytes);
        payload.extend_from_slice(&Ripemd160::digest(key_bytes)[..CHECKSUM_SIZE]);
        format!("{}{}", prefix, bs58::encode(payload).into_string())
    }

    pub(crate) fn inner(&self) -> &secp256k1::PublicKey {
        &self.key
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublicKey({})", self.string_key())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.string_key())
    }
}

impl FromStr for PublicKey {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

/// A private key together with its derived public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self::from_private(PrivateKey::generate())
    }

    pub fn from_private(private_key: PrivateKey) -> Self {
        let public_key = private_key.to_public();
        KeyPair {
            private_key,
            public_key,
        }
    }

    pub fn from_wif(wif: &str) -> Result<Self> {
        Ok(Self::from_private(PrivateKey::from_wif(wif)?))
    }
}

/// A 64-byte compact ECDSA signature, serialized as hex.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; COMPACT_SIGNATURE_SIZE]);

impl Signature {
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text)
            .map_err(|e| SdkError::CryptoError(format!("Invalid signature hex: {}", e)))?;
        let array: [u8; COMPACT_SIGNATURE_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            SdkError::CryptoError(format!(
                "Signature must be exactly {} bytes (compact), got {}",
                COMPACT_SIGNATURE_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Signature(array))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Signature::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Verifies a compact ECDSA signature over `sha256(message)`.
pub fn verify_signature(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<()> {
    let digest = Sha256::digest(message);
    let message = Message::from_digest_slice(&digest)
        .map_err(|e| SdkError::CryptoError(format!("Failed to create message: {}", e)))?;
    let signature = ecdsa::Signature::from_compact(&signature.0)
        .map_err(|e| SdkError::CryptoError(format!("Invalid signature: {}", e)))?;

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, public_key.inner())
        .map_err(|_| SdkError::CryptoError("Signature verification failed".to_string()))
}
