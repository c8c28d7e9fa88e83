/// Validation logic for operations separated from type definitions
use crate::asset::{is_account_id, is_object_id, Asset};
use crate::error::{Result, SdkError};
use crate::transaction::types::{
    BuyContentOp, ContentCancelOp, Operation, SubmitContentOp, TransferOp,
};

/// Co-author shares are basis points of the author's revenue.
pub const MAX_BASIS_POINTS: u32 = 10_000;

/// Length of a RIPEMD-160 content hash in hex.
pub const CONTENT_HASH_HEX_LEN: usize = 40;

impl Operation {
    /// Checks the operation's fields, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::Transfer(op) => op.validate(),
            Operation::ContentCancel(op) => op.validate(),
            Operation::BuyContent(op) => op.validate(),
            Operation::SubmitContent(op) => op.validate(),
        }
    }

    /// Boolean form of [`Operation::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn invalid(msg: impl Into<String>) -> SdkError {
    SdkError::InvalidOperation(msg.into())
}

fn require_account(field: &str, value: &str) -> Result<()> {
    if !is_account_id(value) {
        return Err(invalid(format!(
            "{} must be an account id (1.2.N), got {:?}",
            field, value
        )));
    }
    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn require_asset(field: &str, asset: &Asset) -> Result<()> {
    if !is_object_id(&asset.asset_id) {
        return Err(invalid(format!(
            "{}.asset_id must be an object id, got {:?}",
            field, asset.asset_id
        )));
    }
    Ok(())
}

impl TransferOp {
    pub fn validate(&self) -> Result<()> {
        require_account("from", &self.from)?;
        // Transfers may also target content objects, so any object id is accepted.
        if !is_object_id(&self.to) {
            return Err(invalid(format!("to must be an object id, got {:?}", self.to)));
        }
        if self.from == self.to {
            return Err(invalid("Sender and recipient cannot be the same"));
        }

        require_asset("amount", &self.amount)?;
        if self.amount.amount == 0 {
            return Err(invalid("Transfer amount must be greater than zero"));
        }

        require_non_empty("memo.from", &self.memo.from)?;
        require_non_empty("memo.to", &self.memo.to)?;
        require_non_empty("memo.nonce", &self.memo.nonce)?;
        if self.memo.message.is_empty() {
            return Err(invalid("memo.message cannot be empty"));
        }
        Ok(())
    }
}

impl ContentCancelOp {
    pub fn validate(&self) -> Result<()> {
        require_account("author", &self.author)?;
        require_non_empty("URI", &self.uri)
    }
}

impl BuyContentOp {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("URI", &self.uri)?;
        require_account("consumer", &self.consumer)?;
        require_asset("price", &self.price)
    }
}

impl SubmitContentOp {
    pub fn validate(&self) -> Result<()> {
        require_account("author", &self.author)?;
        require_non_empty("URI", &self.uri)?;
        require_non_empty("synopsis", &self.synopsis)?;

        if self.size == 0 {
            return Err(invalid("Content size must be greater than zero"));
        }

        if self.hash.len() != CONTENT_HASH_HEX_LEN
            || !self.hash.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(invalid(format!(
                "hash must be {} hex characters",
                CONTENT_HASH_HEX_LEN
            )));
        }

        if self.price.is_empty() {
            return Err(invalid("At least one regional price is required"));
        }
        for regional in &self.price {
            require_asset("price", &regional.price)?;
        }
        require_asset("publishing_fee", &self.publishing_fee)?;

        let mut total_basis_points: u32 = 0;
        for co_author in &self.co_authors {
            require_account("co_authors.account", &co_author.account)?;
            total_basis_points = total_basis_points.saturating_add(co_author.basis_points);
        }
        if total_basis_points > MAX_BASIS_POINTS {
            return Err(invalid(format!(
                "Co-author shares total {} basis points (max: {})",
                total_basis_points, MAX_BASIS_POINTS
            )));
        }

        for seeder in &self.seeders {
            require_account("seeders", seeder)?;
        }
        if self.key_parts.len() != self.seeders.len() {
            return Err(invalid(format!(
                "Expected one key part per seeder: {} key parts for {} seeders",
                self.key_parts.len(),
                self.seeders.len()
            )));
        }
        if self.quorum == 0 || self.quorum as usize > self.seeders.len() {
            return Err(invalid(format!(
                "Quorum {} must be between 1 and the number of seeders ({})",
                self.quorum,
                self.seeders.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::RegionalPrice;
    use crate::crypt::elgamal::KeyParts;
    use crate::transaction::memo::Memo;
    use num_bigint::BigUint;

    fn memo() -> Memo {
        Memo {
            from: "DCT6UUbAGbTLLWfY2gAc8XmjGBz2c7WT4fYB5r1L1aHDwAY88ujex".to_string(),
            to: "DCT7vvwEFRtEpUCvoQHUGCEvRPSRUqA3YSN2GFeb2VdxQiytuyxK8".to_string(),
            nonce: "0".to_string(),
            message: vec![1, 2, 3],
        }
    }

    fn key_part() -> KeyParts {
        KeyParts {
            c1: BigUint::from(3u32),
            d1: BigUint::from(9u32),
        }
    }

    fn submit(seeders: usize, key_parts: usize, quorum: u32) -> SubmitContentOp {
        SubmitContentOp {
            size: 10,
            author: "1.2.27".to_string(),
            co_authors: vec![],
            uri: "ipfs:QmContent".to_string(),
            quorum,
            price: vec![RegionalPrice::everywhere(Asset::base(100))],
            hash: "f6ab22f9edb89312dc0838572cc87e2856c13528".to_string(),
            seeders: (0..seeders).map(|i| format!("1.2.{}", 100 + i)).collect(),
            key_parts: (0..key_parts).map(|_| key_part()).collect(),
            expiration: chrono::Utc::now(),
            publishing_fee: Asset::base(1000),
            synopsis: "{\"title\":\"Test\"}".to_string(),
            fee: Asset::default(),
        }
    }

    #[test]
    fn test_transfer_rules() {
        let good = TransferOp::new("1.2.27", "1.2.24", Asset::base(10), memo());
        assert!(good.validate().is_ok());

        let zero = TransferOp::new("1.2.27", "1.2.24", Asset::base(0), memo());
        assert!(zero.validate().is_err());

        let self_send = TransferOp::new("1.2.27", "1.2.27", Asset::base(10), memo());
        assert!(self_send.validate().is_err());

        let bad_id = TransferOp::new("alice", "1.2.24", Asset::base(10), memo());
        assert!(bad_id.validate().is_err());

        let mut empty_memo = good.clone();
        empty_memo.memo.message.clear();
        assert!(empty_memo.validate().is_err());
    }

    #[test]
    fn test_content_cancel_rules() {
        assert!(ContentCancelOp::new("1.2.27", "ipfs:Qm").validate().is_ok());
        assert!(ContentCancelOp::new("1.2.27", "  ").validate().is_err());
        assert!(ContentCancelOp::new("", "ipfs:Qm").validate().is_err());
    }

    #[test]
    fn test_submit_quorum_boundary() {
        assert!(submit(2, 2, 2).validate().is_ok());
        assert!(submit(2, 2, 1).validate().is_ok());

        let err = submit(2, 2, 3).validate().unwrap_err();
        assert!(err.to_string().contains("Quorum 3"));
        assert!(submit(2, 2, 0).validate().is_err());
    }

    #[test]
    fn test_submit_key_parts_must_match_seeders() {
        let err = submit(2, 1, 1).validate().unwrap_err();
        assert!(err.to_string().contains("one key part per seeder"));
    }

    #[test]
    fn test_submit_hash_and_shares() {
        let mut op = submit(1, 1, 1);
        op.hash = "xyz".to_string();
        assert!(op.validate().is_err());

        let mut op = submit(1, 1, 1);
        op.co_authors = vec![
            crate::transaction::types::CoAuthor {
                account: "1.2.30".to_string(),
                basis_points: 6000,
            },
            crate::transaction::types::CoAuthor {
                account: "1.2.31".to_string(),
                basis_points: 5000,
            },
        ];
        assert!(op.validate().is_err());

        let mut op = submit(1, 1, 1);
        op.price.clear();
        assert!(op.validate().is_err());
    }
}
