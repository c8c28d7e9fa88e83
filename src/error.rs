//! Error types for the DECENT SDK

use std::fmt;

/// Every hard failure the SDK can report.
///
/// Operation schema problems are deliberately absent from the hot path: the
/// `add_operation*` methods answer `false` instead of returning an error, so
/// callers can probe an operation without unwinding through `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    InvalidKeyFormat(String),
    ChecksumMismatch,
    DecryptionFailed(String),
    FeeScheduleUnavailable(String),
    BroadcastRejected(String),
    ConnectionLost(String),
    TransactionAlreadyBroadcast,
    EmptyTransaction,
    FeesNotComputed,
    KeyMismatch,
    InvalidOperation(String),
    InvalidAmount(String),
    CryptoError(String),
    SerializationError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SdkError::InvalidKeyFormat(msg) => write!(f, "Invalid key format: {}", msg),
            SdkError::ChecksumMismatch => write!(f, "Checksum mismatch on decrypted payload"),
            SdkError::DecryptionFailed(msg) => write!(f, "Decryption failed: {}", msg),
            SdkError::FeeScheduleUnavailable(msg) => {
                write!(f, "Fee schedule unavailable: {}", msg)
            }
            SdkError::BroadcastRejected(reason) => write!(f, "Broadcast rejected: {}", reason),
            SdkError::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            SdkError::TransactionAlreadyBroadcast => {
                write!(f, "Transaction has already been broadcast")
            }
            SdkError::EmptyTransaction => write!(f, "Transaction has no operations"),
            SdkError::FeesNotComputed => write!(f, "Transaction fees have not been computed"),
            SdkError::KeyMismatch => write!(f, "Public key does not match private key"),
            SdkError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            SdkError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            SdkError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            SdkError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            SdkError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            SdkError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for SdkError {}

impl SdkError {
    /// True for failures reported by (or while reaching) the network connector.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            SdkError::FeeScheduleUnavailable(_)
                | SdkError::BroadcastRejected(_)
                | SdkError::ConnectionLost(_)
        )
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::IoError(err.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for SdkError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        SdkError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for SdkError {
    fn from(err: toml::de::Error) -> Self {
        SdkError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, SdkError>;
