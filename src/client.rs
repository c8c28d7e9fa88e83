//! Explicit SDK context
//!
//! A [`Client`] is built once from a [`Config`] and a connector and then
//! passed by reference to whatever needs it. There is no global instance.

use crate::asset::{Asset, DEFAULT_REGION};
use crate::config::Config;
use crate::connector::{NetworkConnector, Receipt};
use crate::crypt::elgamal::ElGamalPrivate;
use crate::crypto::{KeyPair, PrivateKey, PublicKey};
use crate::error::{Result, SdkError};
use crate::operator::TransactionOperator;
use crate::transaction::{
    BuyContentOp, ContentCancelOp, ContentSubmission, Memo, Operation, Transaction, TransferOp,
};
use std::sync::Arc;
use tracing::info;

/// A transfer with a memo encrypted for the recipient.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: Asset,
    /// Plaintext memo; only its ciphertext leaves the client.
    pub memo: String,
    /// The recipient's memo key.
    pub recipient_memo_key: PublicKey,
    /// Memo nonce; the zero default when `None`.
    pub nonce: Option<String>,
    pub keys: KeyPair,
}

#[derive(Debug, Clone)]
pub struct BuyContentRequest {
    pub uri: String,
    pub consumer: String,
    pub price: Asset,
    /// Defaults to the worldwide region.
    pub region_code_from: Option<u32>,
    pub keys: KeyPair,
}

#[derive(Debug, Clone)]
pub struct SubmitContentRequest {
    pub submission: ContentSubmission,
    pub keys: KeyPair,
}

pub struct Client {
    config: Config,
    operator: TransactionOperator,
}

impl Client {
    /// Validates `config` and wires the operator to `connector`.
    pub fn new(config: Config, connector: Arc<dyn NetworkConnector>) -> Result<Self> {
        config.validate()?;
        let operator = TransactionOperator::new(
            connector,
            config.chain_id_bytes()?,
            config.transaction.expiration_secs,
        );
        Ok(Client { config, operator })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn operator(&self) -> &TransactionOperator {
        &self.operator
    }

    pub fn address_prefix(&self) -> &str {
        &self.config.network.address_prefix
    }

    /// Parses a public key written with the configured prefix.
    pub fn parse_public_key(&self, text: &str) -> Result<PublicKey> {
        PublicKey::from_string_with_prefix(text, self.address_prefix())
    }

    /// An amount of the configured base asset, in its smallest unit.
    pub fn base_asset(&self, amount: u64) -> Asset {
        Asset::new(amount, self.config.network.base_asset_id.clone())
    }

    /// Converts a display amount such as `"1.5"` into the base asset.
    pub fn base_asset_from_display(&self, value: &str) -> Result<Asset> {
        Asset::from_display(
            value,
            self.config.network.base_asset_precision,
            self.config.network.base_asset_id.clone(),
        )
    }

    /// Formats a base-asset amount with the configured precision.
    pub fn format_base_asset(&self, asset: &Asset) -> String {
        asset.to_display(self.config.network.base_asset_precision)
    }

    /// Reads a transfer memo addressed to or from `private_key`.
    pub fn decrypt_memo(&self, memo: &Memo, private_key: &PrivateKey) -> Result<String> {
        memo.decrypt_with_prefix(private_key, self.address_prefix())
    }

    pub fn create_transaction(&self) -> Transaction {
        self.operator.create_transaction()
    }

    pub async fn set_transaction_fees(&self, transaction: &mut Transaction) -> Result<()> {
        self.operator.set_transaction_fees(transaction).await
    }

    pub async fn broadcast_transaction(
        &self,
        transaction: &mut Transaction,
        private_key: &PrivateKey,
        public_key: &PublicKey,
    ) -> Result<Receipt> {
        self.operator
            .broadcast_transaction(transaction, private_key, public_key)
            .await
    }

    /// Validates `operation` and broadcasts it as a one-operation transaction.
    async fn submit_single(&self, operation: Operation, keys: &KeyPair) -> Result<Receipt> {
        operation.validate()?;
        let kind = operation.kind();

        let mut transaction = self.create_transaction();
        if !transaction.add_operation(operation)? {
            return Err(SdkError::InvalidOperation(format!("{} rejected", kind)));
        }
        let receipt = self
            .broadcast_transaction(&mut transaction, &keys.private_key, &keys.public_key)
            .await?;
        info!(kind = %kind, tx_id = %receipt.transaction_id, "client.operation_submitted");
        Ok(receipt)
    }

    pub async fn transfer(&self, request: TransferRequest) -> Result<Receipt> {
        let memo = Memo::encrypt_with_prefix(
            &request.memo,
            &request.keys.private_key,
            &request.recipient_memo_key,
            request.nonce.as_deref(),
            self.address_prefix(),
        )?;
        let op = TransferOp::new(request.from, request.to, request.amount, memo);
        self.submit_single(Operation::Transfer(op), &request.keys)
            .await
    }

    /// Requests content, registering the buyer's ElGamal key derived from
    /// the signing key.
    pub async fn buy_content(&self, request: BuyContentRequest) -> Result<Receipt> {
        let elgamal = ElGamalPrivate::derive(&request.keys.private_key).public();
        let op = BuyContentOp::new(
            request.uri,
            request.consumer,
            request.price,
            request.region_code_from.unwrap_or(DEFAULT_REGION),
            elgamal,
        );
        self.submit_single(Operation::BuyContent(op), &request.keys)
            .await
    }

    pub async fn cancel_content(
        &self,
        uri: &str,
        author: &str,
        keys: &KeyPair,
    ) -> Result<Receipt> {
        let op = ContentCancelOp::new(author, uri);
        self.submit_single(Operation::ContentCancel(op), keys).await
    }

    /// Publishes content, splitting its key among the chosen seeders.
    pub async fn submit_content(&self, request: SubmitContentRequest) -> Result<Receipt> {
        let op = request.submission.into_operation()?;
        self.submit_single(Operation::SubmitContent(op), &request.keys)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::ChainHead;
    use crate::transaction::{OperationKind, SignedTransaction};
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl NetworkConnector for Offline {
        async fn fee_schedule(&self, _kind: OperationKind) -> Result<Asset> {
            Err(SdkError::ConnectionLost("offline".to_string()))
        }

        async fn chain_head(&self) -> Result<ChainHead> {
            Err(SdkError::ConnectionLost("offline".to_string()))
        }

        async fn broadcast(&self, _transaction: &SignedTransaction) -> Result<Receipt> {
            Err(SdkError::ConnectionLost("offline".to_string()))
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.transaction.expiration_secs = 0;
        assert!(matches!(
            Client::new(config, Arc::new(Offline)),
            Err(SdkError::ConfigError(_))
        ));
    }

    #[test]
    fn test_base_asset_follows_config() {
        let mut config = Config::default();
        config.network.base_asset_id = "1.3.44".to_string();
        config.network.base_asset_precision = 2;
        let client = Client::new(config, Arc::new(Offline)).unwrap();

        let asset = client.base_asset_from_display("1.5").unwrap();
        assert_eq!(asset, Asset::new(150, "1.3.44"));
        assert_eq!(client.base_asset(7).asset_id, "1.3.44");
        assert_eq!(client.format_base_asset(&asset), "1.5");
    }

    #[test]
    fn test_public_key_uses_configured_prefix() {
        let mut config = Config::default();
        config.network.address_prefix = "TST".to_string();
        let client = Client::new(config, Arc::new(Offline)).unwrap();

        let key = PrivateKey::generate().to_public();
        let text = key.to_string_with_prefix("TST");
        assert_eq!(client.parse_public_key(&text).unwrap(), key);
        assert!(client.parse_public_key(&key.string_key()).is_err());
    }

    #[tokio::test]
    async fn test_invalid_cancel_fails_before_network() {
        let client = Client::new(Config::default(), Arc::new(Offline)).unwrap();
        let err = client
            .cancel_content("", "1.2.27", &KeyPair::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_offline_fee_query() {
        let client = Client::new(Config::default(), Arc::new(Offline)).unwrap();
        let err = client
            .cancel_content("ipfs:QmA", "1.2.27", &KeyPair::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::FeeScheduleUnavailable(_)));
    }
}
