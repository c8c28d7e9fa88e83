/// Transaction assembly: ordered operations, fees, reference block and signatures
use crate::asset::Asset;
use crate::connector::ChainHead;
use crate::crypto::{verify_signature, PrivateKey, PublicKey, Signature};
use crate::error::{Result, SdkError};
use crate::transaction::types::{Operation, OperationKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// Bytes of the SHA-256 digest used as transaction id.
const TRANSACTION_ID_SIZE: usize = 20;

/// Lifecycle of a [`Transaction`]. `Broadcast` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Empty,
    HasOperations,
    FeesComputed,
    Signed,
    Broadcast,
}

/// The signed part of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    /// Unix seconds after which the network drops the transaction.
    pub expiration: u32,
    pub operations: Vec<Operation>,
}

impl TransactionBody {
    /// Canonical serialization of the body.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// `chain_id || body`, the bytes every signer signs.
    pub fn signable_bytes(&self, chain_id: &[u8; 32]) -> Result<Vec<u8>> {
        let mut message = chain_id.to_vec();
        message.extend_from_slice(&self.to_bytes()?);
        Ok(message)
    }

    /// Hex of the first 20 bytes of `sha256(body)`.
    pub fn id(&self) -> Result<String> {
        let digest = Sha256::digest(self.to_bytes()?);
        Ok(hex::encode(&digest[..TRANSACTION_ID_SIZE]))
    }
}

/// What the connector submits: the body plus its signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub body: TransactionBody,
    pub signatures: Vec<Signature>,
}

impl SignedTransaction {
    pub fn id(&self) -> Result<String> {
        self.body.id()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

/// A transaction under construction.
///
/// Owned and mutated by a single caller; after a successful broadcast every
/// mutating call fails with `TransactionAlreadyBroadcast`.
#[derive(Debug, Clone)]
pub struct Transaction {
    body: TransactionBody,
    signatures: Vec<Signature>,
    signers: Vec<PublicKey>,
    state: TransactionState,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        Transaction {
            body: TransactionBody::default(),
            signatures: Vec::new(),
            signers: Vec::new(),
            state: TransactionState::Empty,
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn operations(&self) -> &[Operation] {
        &self.body.operations
    }

    pub fn operation_count(&self) -> usize {
        self.body.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.operations.is_empty()
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// True once [`Transaction::set_reference_block`] has bound the body.
    pub fn has_reference_block(&self) -> bool {
        self.body.expiration != 0
    }

    pub fn is_broadcast(&self) -> bool {
        self.state == TransactionState::Broadcast
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_broadcast() {
            return Err(SdkError::TransactionAlreadyBroadcast);
        }
        Ok(())
    }

    fn ensure_has_operations(&self) -> Result<()> {
        self.ensure_mutable()?;
        if self.is_empty() {
            return Err(SdkError::EmptyTransaction);
        }
        Ok(())
    }

    fn clear_signatures(&mut self) {
        self.signatures.clear();
        self.signers.clear();
    }

    /// Appends `operation` if it validates.
    ///
    /// Returns `Ok(false)` and leaves the transaction untouched when the
    /// operation is invalid. Adding to a transaction with computed fees or
    /// signatures drops it back to `HasOperations` and discards signatures.
    pub fn add_operation(&mut self, operation: Operation) -> Result<bool> {
        self.ensure_mutable()?;

        if let Err(e) = operation.validate() {
            debug!(kind = %operation.kind(), reason = %e, "transaction.operation_rejected");
            return Ok(false);
        }

        self.body.operations.push(operation);
        self.clear_signatures();
        self.state = TransactionState::HasOperations;
        Ok(true)
    }

    /// Untyped form of [`Transaction::add_operation`].
    ///
    /// An unknown `name`, or `data` missing a required field, answers
    /// `Ok(false)` instead of an error.
    pub fn add_operation_json(&mut self, name: &str, data: serde_json::Value) -> Result<bool> {
        self.ensure_mutable()?;

        match Operation::from_json(name, data) {
            None => {
                debug!(name, "transaction.unknown_operation");
                Ok(false)
            }
            Some(Err(e)) => {
                debug!(name, reason = %e, "transaction.operation_schema_invalid");
                Ok(false)
            }
            Some(Ok(operation)) => self.add_operation(operation),
        }
    }

    /// Kinds present in the transaction, in first-appearance order.
    pub fn operation_kinds(&self) -> Vec<OperationKind> {
        let mut kinds = Vec::new();
        for op in &self.body.operations {
            let kind = op.kind();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Attaches a fee to every operation from a per-kind schedule.
    pub fn apply_fees(&mut self, schedule: &HashMap<OperationKind, Asset>) -> Result<()> {
        self.ensure_has_operations()?;

        for kind in self.operation_kinds() {
            if !schedule.contains_key(&kind) {
                return Err(SdkError::FeeScheduleUnavailable(format!(
                    "No fee for {}",
                    kind
                )));
            }
        }
        for op in self.body.operations.iter_mut() {
            if let Some(fee) = schedule.get(&op.kind()) {
                op.set_fee(fee.clone());
            }
        }

        self.clear_signatures();
        self.state = TransactionState::FeesComputed;
        Ok(())
    }

    /// Sum of the fees currently attached, per asset.
    pub fn total_fees(&self) -> HashMap<String, u64> {
        let mut totals: HashMap<String, u64> = HashMap::new();
        for op in &self.body.operations {
            let fee = op.fee();
            *totals.entry(fee.asset_id.clone()).or_default() += fee.amount;
        }
        totals
    }

    /// Binds the transaction to `head` and expires it `expiration_secs` later.
    /// Existing signatures are discarded.
    pub fn set_reference_block(&mut self, head: &ChainHead, expiration_secs: u32) -> Result<()> {
        self.ensure_has_operations()?;

        self.body.ref_block_num = head.ref_block_num();
        self.body.ref_block_prefix = head.ref_block_prefix()?;
        self.body.expiration = head.time.saturating_add(expiration_secs);

        if self.state == TransactionState::Signed {
            self.clear_signatures();
            self.state = TransactionState::FeesComputed;
        }
        Ok(())
    }

    /// Adds a signature by `private_key`. Signing twice with one key is a no-op.
    pub fn sign(&mut self, private_key: &PrivateKey, chain_id: &[u8; 32]) -> Result<Signature> {
        self.ensure_has_operations()?;
        if self.state == TransactionState::HasOperations {
            return Err(SdkError::FeesNotComputed);
        }

        let public_key = private_key.to_public();
        if let Some(pos) = self.signers.iter().position(|k| *k == public_key) {
            return Ok(self.signatures[pos]);
        }

        let signature = private_key.sign(&self.body.signable_bytes(chain_id)?)?;
        self.signatures.push(signature);
        self.signers.push(public_key);
        self.state = TransactionState::Signed;
        Ok(signature)
    }

    /// Succeeds if one of the signatures belongs to `public_key`.
    pub fn verify_signature(&self, chain_id: &[u8; 32], public_key: &PublicKey) -> Result<()> {
        let message = self.body.signable_bytes(chain_id)?;
        if self
            .signatures
            .iter()
            .any(|sig| verify_signature(public_key, &message, sig).is_ok())
        {
            Ok(())
        } else {
            Err(SdkError::CryptoError(
                "No signature from the given key".to_string(),
            ))
        }
    }

    pub fn id(&self) -> Result<String> {
        self.body.id()
    }

    /// Snapshot handed to the connector.
    pub fn to_signed(&self) -> SignedTransaction {
        SignedTransaction {
            body: self.body.clone(),
            signatures: self.signatures.clone(),
        }
    }

    pub(crate) fn mark_broadcast(&mut self) {
        self.state = TransactionState::Broadcast;
    }
}
