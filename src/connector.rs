//! Boundary to the external network
//!
//! The SDK never talks to nodes itself. Everything it needs from the network
//! goes through a [`NetworkConnector`] supplied by the caller: a websocket
//! RPC client, an HTTP gateway, or a test double.

use crate::asset::Asset;
use crate::error::{Result, SdkError};
use crate::transaction::{OperationKind, SignedTransaction};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The latest block as reported by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    pub head_block_number: u32,
    /// Hex block id (20 bytes).
    pub head_block_id: String,
    /// Head block time, unix seconds.
    pub time: u32,
}

impl ChainHead {
    /// Low 16 bits of the head block number.
    pub fn ref_block_num(&self) -> u16 {
        (self.head_block_number & 0xffff) as u16
    }

    /// Bytes 4..8 of the block id, little endian.
    pub fn ref_block_prefix(&self) -> Result<u32> {
        let id = hex::decode(&self.head_block_id).map_err(|e| {
            SdkError::SerializationError(format!("Invalid head block id: {}", e))
        })?;
        if id.len() < 8 {
            return Err(SdkError::SerializationError(format!(
                "Head block id too short: {} bytes",
                id.len()
            )));
        }
        Ok(u32::from_le_bytes([id[4], id[5], id[6], id[7]]))
    }
}

/// What the network returns once it accepts a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_id: String,
    pub block_num: u32,
    pub trx_num: u32,
}

/// Network access used by the transaction operator.
///
/// Implementations must be usable from many in-flight transactions at once.
/// They should report an unreachable fee schedule as
/// `FeeScheduleUnavailable`, a node refusal as `BroadcastRejected` and a
/// dropped link as `ConnectionLost`. The SDK never retries any call.
#[async_trait]
pub trait NetworkConnector: Send + Sync {
    /// Current fee for one operation of `kind`.
    async fn fee_schedule(&self, kind: OperationKind) -> Result<Asset>;

    /// Head block used to bind transactions to the current chain.
    async fn chain_head(&self) -> Result<ChainHead>;

    /// Submits a signed transaction exactly once.
    async fn broadcast(&self, transaction: &SignedTransaction) -> Result<Receipt>;
}
