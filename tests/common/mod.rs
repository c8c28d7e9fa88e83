//! In-memory network used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use decent_sdk::asset::Asset;
use decent_sdk::connector::{ChainHead, NetworkConnector, Receipt};
use decent_sdk::error::{Result, SdkError};
use decent_sdk::transaction::{OperationKind, SignedTransaction};
use parking_lot::Mutex;
use std::collections::HashMap;

pub const HEAD_BLOCK_ID: &str = "0001e240aabbccdd00112233445566778899aabb";
pub const HEAD_TIME: u32 = 1_700_000_000;

/// Records every call and answers from configurable tables.
pub struct TestConnector {
    fees: Mutex<HashMap<OperationKind, Asset>>,
    fee_error: Mutex<Option<SdkError>>,
    broadcast_error: Mutex<Option<SdkError>>,
    fee_queries: Mutex<Vec<OperationKind>>,
    broadcasts: Mutex<Vec<SignedTransaction>>,
}

impl TestConnector {
    pub fn new() -> Self {
        let fees = [
            (OperationKind::Transfer, Asset::base(500_000)),
            (OperationKind::ContentCancel, Asset::base(100_000)),
            (OperationKind::BuyContent, Asset::base(200_000)),
            (OperationKind::SubmitContent, Asset::base(1_000_000)),
        ]
        .into_iter()
        .collect();

        Self {
            fees: Mutex::new(fees),
            fee_error: Mutex::new(None),
            broadcast_error: Mutex::new(None),
            fee_queries: Mutex::new(Vec::new()),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_fee(&self, kind: OperationKind, fee: Asset) {
        self.fees.lock().insert(kind, fee);
    }

    pub fn fail_fees(&self, error: SdkError) {
        *self.fee_error.lock() = Some(error);
    }

    pub fn fail_broadcast(&self, error: SdkError) {
        *self.broadcast_error.lock() = Some(error);
    }

    pub fn recover(&self) {
        *self.fee_error.lock() = None;
        *self.broadcast_error.lock() = None;
    }

    pub fn fee_queries(&self) -> Vec<OperationKind> {
        self.fee_queries.lock().clone()
    }

    pub fn broadcasts(&self) -> Vec<SignedTransaction> {
        self.broadcasts.lock().clone()
    }
}

#[async_trait]
impl NetworkConnector for TestConnector {
    async fn fee_schedule(&self, kind: OperationKind) -> Result<Asset> {
        self.fee_queries.lock().push(kind);
        if let Some(err) = self.fee_error.lock().clone() {
            return Err(err);
        }
        self.fees
            .lock()
            .get(&kind)
            .cloned()
            .ok_or_else(|| SdkError::FeeScheduleUnavailable(format!("no fee for {}", kind)))
    }

    async fn chain_head(&self) -> Result<ChainHead> {
        Ok(ChainHead {
            head_block_number: 123_456,
            head_block_id: HEAD_BLOCK_ID.to_string(),
            time: HEAD_TIME,
        })
    }

    async fn broadcast(&self, transaction: &SignedTransaction) -> Result<Receipt> {
        if let Some(err) = self.broadcast_error.lock().clone() {
            return Err(err);
        }
        let mut broadcasts = self.broadcasts.lock();
        broadcasts.push(transaction.clone());
        Ok(Receipt {
            transaction_id: transaction.id()?,
            block_num: 123_457,
            trx_num: broadcasts.len() as u32 - 1,
        })
    }
}
