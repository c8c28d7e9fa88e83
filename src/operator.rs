//! Fee computation, signing and broadcast of transactions

use crate::asset::Asset;
use crate::connector::{NetworkConnector, Receipt};
use crate::crypto::{PrivateKey, PublicKey};
use crate::error::{Result, SdkError};
use crate::transaction::{OperationKind, Transaction, TransactionState};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives transactions through the network connector.
///
/// Cheap to clone; clones share the connector.
#[derive(Clone)]
pub struct TransactionOperator {
    connector: Arc<dyn NetworkConnector>,
    chain_id: [u8; 32],
    expiration_secs: u32,
}

impl std::fmt::Debug for TransactionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("TransactionOperator")
            .field("chain_id", &hex::encode(self.chain_id))
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

impl TransactionOperator {
    pub fn new(
        connector: Arc<dyn NetworkConnector>,
        chain_id: [u8; 32],
        expiration_secs: u32,
    ) -> Self {
        Self {
            connector,
            chain_id,
            expiration_secs,
        }
    }

    pub fn chain_id(&self) -> &[u8; 32] {
        &self.chain_id
    }

    pub fn connector(&self) -> &Arc<dyn NetworkConnector> {
        &self.connector
    }

    pub fn create_transaction(&self) -> Transaction {
        Transaction::new()
    }

    /// Queries the fee for every distinct operation kind once and attaches
    /// it to each operation.
    pub async fn set_transaction_fees(&self, transaction: &mut Transaction) -> Result<()> {
        if transaction.is_broadcast() {
            return Err(SdkError::TransactionAlreadyBroadcast);
        }
        if transaction.is_empty() {
            return Err(SdkError::EmptyTransaction);
        }

        let mut schedule: HashMap<OperationKind, Asset> = HashMap::new();
        for kind in transaction.operation_kinds() {
            let fee = self.connector.fee_schedule(kind).await.map_err(|e| match e {
                SdkError::ConnectionLost(msg) => SdkError::FeeScheduleUnavailable(msg),
                other => other,
            })?;
            debug!(kind = %kind, fee = %fee, "operator.fee_quoted");
            schedule.insert(kind, fee);
        }

        transaction.apply_fees(&schedule)?;
        info!(
            operations = transaction.operation_count(),
            kinds = schedule.len(),
            "operator.fees_computed"
        );
        Ok(())
    }

    /// Computes missing fees, signs with `private_key` and submits once.
    ///
    /// A rejected or lost broadcast leaves the transaction signed.
    pub async fn broadcast_transaction(
        &self,
        transaction: &mut Transaction,
        private_key: &PrivateKey,
        public_key: &PublicKey,
    ) -> Result<Receipt> {
        if transaction.is_broadcast() {
            return Err(SdkError::TransactionAlreadyBroadcast);
        }
        if private_key.to_public() != *public_key {
            return Err(SdkError::KeyMismatch);
        }
        if transaction.is_empty() {
            return Err(SdkError::EmptyTransaction);
        }

        if transaction.state() == TransactionState::HasOperations {
            self.set_transaction_fees(transaction).await?;
        }
        // Signatures made before the body was bound are discarded here.
        if transaction.state() != TransactionState::Signed || !transaction.has_reference_block() {
            let head = self.connector.chain_head().await?;
            transaction.set_reference_block(&head, self.expiration_secs)?;
        }
        transaction.sign(private_key, &self.chain_id)?;

        let tx_id = transaction.id()?;
        let signed = transaction.to_signed();
        match self.connector.broadcast(&signed).await {
            Ok(receipt) => {
                transaction.mark_broadcast();
                info!(
                    tx_id = %tx_id,
                    operations = signed.body.operations.len(),
                    block_num = receipt.block_num,
                    "operator.broadcast"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(tx_id = %tx_id, error = %e, "operator.broadcast_failed");
                Err(e)
            }
        }
    }
}
