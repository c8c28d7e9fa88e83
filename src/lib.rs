//! decent-sdk - Transaction assembly and content cryptography for DECENT
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Transactions
//! - [`transaction`] - Operation types, validation, memos and the builder
//! - [`operator`] - Fee computation, signing and broadcast
//! - [`asset`] - Asset amounts and object ids
//!
//! ## Cryptography
//! - [`crypto`] - secp256k1 keys, WIF and signatures
//! - [`crypt`] - Memo cipher, ElGamal and content-key splitting
//!
//! ## Integration
//! - [`connector`] - Network boundary implemented by callers
//! - [`client`] - Explicit SDK context and convenience flows
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Transactions
// ============================================================================
pub mod asset;
pub mod operator;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypt;
pub mod crypto;

// ============================================================================
// Integration
// ============================================================================
pub mod client;
pub mod connector;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
pub mod logging;

pub use client::{BuyContentRequest, Client, SubmitContentRequest, TransferRequest};
pub use connector::{ChainHead, NetworkConnector, Receipt};
pub use error::{Result, SdkError};
pub use operator::TransactionOperator;
