/// Encrypted transfer memos
use crate::crypt::cipher::{decrypt_with_checksum, encrypt_with_checksum, DEFAULT_NONCE};
use crate::crypto::{PrivateKey, PublicKey, DEFAULT_ADDRESS_PREFIX};
use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};

/// A note attached to a transfer. `message` is always ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub from: String,
    pub to: String,
    pub nonce: String,
    #[serde(with = "hex::serde")]
    pub message: Vec<u8>,
}

impl Memo {
    /// Encrypts `text` from `sender` to `recipient`. Without a nonce the
    /// zero default is used; see [`DEFAULT_NONCE`].
    pub fn encrypt(
        text: &str,
        sender: &PrivateKey,
        recipient: &PublicKey,
        nonce: Option<&str>,
    ) -> Result<Self> {
        Self::encrypt_with_prefix(text, sender, recipient, nonce, DEFAULT_ADDRESS_PREFIX)
    }

    /// Like [`Memo::encrypt`], writing both keys with `prefix`.
    pub fn encrypt_with_prefix(
        text: &str,
        sender: &PrivateKey,
        recipient: &PublicKey,
        nonce: Option<&str>,
        prefix: &str,
    ) -> Result<Self> {
        let nonce = nonce.unwrap_or(DEFAULT_NONCE);
        let message = encrypt_with_checksum(text, sender, recipient, Some(nonce))?;
        Ok(Memo {
            from: sender.to_public().to_string_with_prefix(prefix),
            to: recipient.to_string_with_prefix(prefix),
            nonce: nonce.to_string(),
            message,
        })
    }

    /// Decrypts the memo with either party's private key.
    pub fn decrypt_bytes(&self, private_key: &PrivateKey) -> Result<Vec<u8>> {
        self.decrypt_bytes_with_prefix(private_key, DEFAULT_ADDRESS_PREFIX)
    }

    /// Like [`Memo::decrypt_bytes`] for keys written with `prefix`.
    pub fn decrypt_bytes_with_prefix(
        &self,
        private_key: &PrivateKey,
        prefix: &str,
    ) -> Result<Vec<u8>> {
        let own = private_key.to_public().to_string_with_prefix(prefix);
        let counterparty = if own == self.to {
            &self.from
        } else if own == self.from {
            &self.to
        } else {
            return Err(SdkError::KeyMismatch);
        };
        let counterparty = PublicKey::from_string_with_prefix(counterparty, prefix)?;
        decrypt_with_checksum(&self.message, private_key, &counterparty, Some(&self.nonce))
    }

    pub fn decrypt(&self, private_key: &PrivateKey) -> Result<String> {
        self.decrypt_with_prefix(private_key, DEFAULT_ADDRESS_PREFIX)
    }

    pub fn decrypt_with_prefix(&self, private_key: &PrivateKey, prefix: &str) -> Result<String> {
        String::from_utf8(self.decrypt_bytes_with_prefix(private_key, prefix)?)
            .map_err(|e| SdkError::DecryptionFailed(format!("Memo is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_parties_can_read() {
        let alice = PrivateKey::generate();
        let bob = PrivateKey::generate();
        let memo = Memo::encrypt("invoice #42", &alice, &bob.to_public(), Some("99")).unwrap();

        assert_eq!(memo.from, alice.to_public().string_key());
        assert_eq!(memo.to, bob.to_public().string_key());
        assert_eq!(memo.decrypt(&bob).unwrap(), "invoice #42");
        assert_eq!(memo.decrypt(&alice).unwrap(), "invoice #42");
    }

    #[test]
    fn test_outsider_rejected() {
        let alice = PrivateKey::generate();
        let bob = PrivateKey::generate();
        let memo = Memo::encrypt("hi", &alice, &bob.to_public(), None).unwrap();
        assert_eq!(memo.nonce, DEFAULT_NONCE);
        assert_eq!(
            memo.decrypt(&PrivateKey::generate()).unwrap_err(),
            SdkError::KeyMismatch
        );
    }

    #[test]
    fn test_custom_prefix() {
        let alice = PrivateKey::generate();
        let bob = PrivateKey::generate();
        let memo =
            Memo::encrypt_with_prefix("testnet", &alice, &bob.to_public(), None, "TST").unwrap();

        assert!(memo.from.starts_with("TST"));
        assert!(memo.to.starts_with("TST"));
        assert_eq!(memo.decrypt_with_prefix(&bob, "TST").unwrap(), "testnet");
        assert_eq!(memo.decrypt_with_prefix(&alice, "TST").unwrap(), "testnet");
        assert_eq!(memo.decrypt(&bob).unwrap_err(), SdkError::KeyMismatch);
    }

    #[test]
    fn test_tampered_message_fails_closed() {
        let alice = PrivateKey::generate();
        let bob = PrivateKey::generate();
        let mut memo = Memo::encrypt("pay 10", &alice, &bob.to_public(), None).unwrap();
        memo.message[0] ^= 0xff;
        assert!(memo.decrypt(&bob).is_err());
    }

    #[test]
    fn test_message_serializes_as_hex() {
        let alice = PrivateKey::generate();
        let bob = PrivateKey::generate();
        let memo = Memo::encrypt("hi", &alice, &bob.to_public(), None).unwrap();
        let json = serde_json::to_value(&memo).unwrap();
        assert_eq!(json["message"], hex::encode(&memo.message));
        let decoded: Memo = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, memo);
    }
}
