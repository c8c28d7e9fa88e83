//! ElGamal keys for content-key encryption
//!
//! These keys are separate from the account signing keys. A buyer publishes
//! its ElGamal public key in `buy_content`; seeders use theirs to receive
//! shares of a content key as [`KeyParts`].

use crate::crypto::PrivateKey;
use crate::error::{Result, SdkError};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};
use std::fmt;
use std::str::FromStr;

/// 512-bit safe prime defining the ElGamal group.
pub static MODULUS: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(
        b"11760620558671662461946567396662025495126946227619472274601251081547302009186313201119191293557856181195016058359990840577430081932807832465057884143546419",
        10,
    )
    .unwrap_or_default()
});

/// Group generator.
pub static GENERATOR: Lazy<BigUint> = Lazy::new(|| BigUint::from(3u32));

/// An ElGamal ciphertext `(C1, D1)` of one content-key share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParts {
    #[serde(rename = "C1", with = "decimal")]
    pub c1: BigUint,
    #[serde(rename = "D1", with = "decimal")]
    pub d1: BigUint,
}

/// ElGamal private exponent.
#[derive(Clone, PartialEq, Eq)]
pub struct ElGamalPrivate(BigUint);

impl ElGamalPrivate {
    /// Derives the exponent from an account key: `sha512(raw_private_key)`
    /// read as a big-endian integer.
    pub fn derive(private_key: &PrivateKey) -> Self {
        let digest = Sha512::digest(private_key.raw());
        ElGamalPrivate(BigUint::from_bytes_be(&digest))
    }

    pub fn from_wif(wif: &str) -> Result<Self> {
        Ok(Self::derive(&PrivateKey::from_wif(wif)?))
    }

    /// `g^x mod p`
    pub fn public(&self) -> ElGamalPublic {
        ElGamalPublic(GENERATOR.modpow(&self.0, &MODULUS))
    }

    /// Recovers the share hidden in `parts`: `D1 * C1^-x mod p`.
    pub fn decrypt(&self, parts: &KeyParts) -> Result<BigUint> {
        let p = &*MODULUS;
        if parts.c1.is_zero() || &parts.c1 >= p || &parts.d1 >= p {
            return Err(SdkError::DecryptionFailed(
                "Key part outside the ElGamal group".to_string(),
            ));
        }
        let order = p - BigUint::one();
        // C1^(p-1-x) == C1^-x since C1^(p-1) == 1.
        let exponent = &order - (&self.0 % &order);
        let mask_inverse = parts.c1.modpow(&exponent, p);
        Ok((&parts.d1 * mask_inverse) % p)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Debug for ElGamalPrivate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ElGamalPrivate(<redacted>)")
    }
}

impl fmt::Display for ElGamalPrivate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ElGamalPrivate {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        parse_decimal(s).map(ElGamalPrivate)
    }
}

/// ElGamal public key `g^x mod p`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElGamalPublic(BigUint);

impl ElGamalPublic {
    pub fn from_biguint(value: BigUint) -> Result<Self> {
        if value.is_zero() || value >= *MODULUS {
            return Err(SdkError::InvalidKeyFormat(
                "ElGamal public key outside the group".to_string(),
            ));
        }
        Ok(ElGamalPublic(value))
    }

    /// Encrypts `message` (which must be smaller than the modulus).
    pub fn encrypt(&self, message: &BigUint) -> Result<KeyParts> {
        let p = &*MODULUS;
        if message >= p {
            return Err(SdkError::CryptoError(
                "Message does not fit in the ElGamal group".to_string(),
            ));
        }
        let ephemeral = rand::thread_rng().gen_biguint_range(&BigUint::one(), &(p - BigUint::one()));
        let c1 = GENERATOR.modpow(&ephemeral, p);
        let d1 = (message * self.0.modpow(&ephemeral, p)) % p;
        Ok(KeyParts { c1, d1 })
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for ElGamalPublic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ElGamalPublic {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_biguint(parse_decimal(s)?)
    }
}

impl Serialize for ElGamalPublic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        decimal::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for ElGamalPublic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = decimal::deserialize(deserializer)?;
        ElGamalPublic::from_biguint(value).map_err(serde::de::Error::custom)
    }
}

/// ElGamal private key of a WIF account key, as a decimal string.
pub fn derive_elgamal_private(wif: &str) -> Result<String> {
    Ok(ElGamalPrivate::from_wif(wif)?.to_string())
}

/// ElGamal public key for a decimal private exponent, as a decimal string.
pub fn derive_elgamal_public(elgamal_private: &str) -> Result<String> {
    Ok(elgamal_private.parse::<ElGamalPrivate>()?.public().to_string())
}

fn parse_decimal(text: &str) -> Result<BigUint> {
    // The network appends a trailing '.' to big integers in some responses.
    let digits = text.trim().trim_end_matches('.');
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| SdkError::InvalidKeyFormat(format!("Not a decimal integer: {}", text)))
}

/// Serde adapter writing big integers as decimal strings.
pub(crate) mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_decimal(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";
    const ELGAMAL_PRIVATE: &str = "3383112928305888235611347193209059203047218834450399563120975844251214595709040896810866682871020539727275817325173305205860102058536117475965003296292822";
    const ELGAMAL_PUBLIC: &str = "241959380214287749130686828851705192575927186235711746796041800195785322928433133858745273985589005019090122053144174996998506464680227844152219692500812";

    #[test]
    fn test_modulus_parsed() {
        assert_eq!(MODULUS.bits(), 512);
    }

    #[test]
    fn test_derivation_golden_values() {
        let private = derive_elgamal_private(WIF).unwrap();
        assert_eq!(private, ELGAMAL_PRIVATE);
        assert_eq!(derive_elgamal_public(&private).unwrap(), ELGAMAL_PUBLIC);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let key = PrivateKey::generate();
        assert_eq!(
            ElGamalPrivate::derive(&key).public(),
            ElGamalPrivate::derive(&key).public()
        );
    }

    #[test]
    fn test_trailing_dot_accepted() {
        let with_dot = format!("{}.", ELGAMAL_PUBLIC);
        let parsed: ElGamalPublic = with_dot.parse().unwrap();
        assert_eq!(parsed.to_string(), ELGAMAL_PUBLIC);
        assert!("12ab".parse::<ElGamalPublic>().is_err());
        assert!("0".parse::<ElGamalPublic>().is_err());
    }

    #[test]
    fn test_encrypt_decrypt_share() {
        let private = ElGamalPrivate::derive(&PrivateKey::generate());
        let public = private.public();
        let share = BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap();

        let parts = public.encrypt(&share).unwrap();
        assert_eq!(private.decrypt(&parts).unwrap(), share);

        let other = ElGamalPrivate::derive(&PrivateKey::generate());
        assert_ne!(other.decrypt(&parts).unwrap(), share);
    }

    #[test]
    fn test_key_parts_serialize_as_decimal_strings() {
        let parts = KeyParts {
            c1: BigUint::from(42u32),
            d1: BigUint::from(7u32),
        };
        let json = serde_json::to_value(&parts).unwrap();
        assert_eq!(json, serde_json::json!({ "C1": "42", "D1": "7" }));
        let decoded: KeyParts = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, parts);
    }

    #[test]
    fn test_oversized_message_rejected() {
        let public = ElGamalPrivate::derive(&PrivateKey::generate()).public();
        assert!(public.encrypt(&MODULUS).is_err());
    }
}
