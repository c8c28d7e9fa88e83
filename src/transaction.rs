//! Transaction module split into operation types, validation and the builder

pub mod builder;
pub mod memo;
pub mod types;
pub mod validation;

pub use builder::{SignedTransaction, Transaction, TransactionBody, TransactionState};
pub use memo::Memo;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::crypto::PrivateKey;
    use serde_json::json;

    fn memo_json() -> serde_json::Value {
        let sender = PrivateKey::generate();
        let recipient = PrivateKey::generate();
        let memo = Memo::encrypt("for the coffee", &sender, &recipient.to_public(), None).unwrap();
        serde_json::to_value(memo).unwrap()
    }

    #[test]
    fn test_transfer_without_memo_rejected() {
        let mut tx = Transaction::new();
        let data = json!({
            "from": "1.2.27",
            "to": "1.2.24",
            "amount": { "amount": 10, "asset_id": "1.3.0" }
        });

        assert!(!tx.add_operation_json("transfer", data).unwrap());
        assert_eq!(tx.operation_count(), 0);
        assert_eq!(tx.state(), TransactionState::Empty);
    }

    #[test]
    fn test_well_formed_transfer_accepted() {
        let mut tx = Transaction::new();
        let data = json!({
            "from": "1.2.27",
            "to": "1.2.24",
            "amount": { "amount": 10, "asset_id": "1.3.0" },
            "memo": memo_json()
        });
        let expected = match Operation::from_json("transfer", data.clone()) {
            Some(Ok(op)) => op,
            other => panic!("Expected a transfer, got {:?}", other),
        };

        assert!(tx.add_operation_json("transfer", data).unwrap());
        assert_eq!(tx.operation_count(), 1);
        assert_eq!(tx.operations()[0], expected);

        if let Operation::Transfer(op) = &tx.operations()[0] {
            assert_eq!(op.from, "1.2.27");
            assert_eq!(op.to, "1.2.24");
            assert_eq!(op.amount, Asset::new(10, "1.3.0"));
        } else {
            panic!("Expected Transfer operation");
        }
    }

    #[test]
    fn test_alias_names_accepted() {
        let mut tx = Transaction::new();
        let data = json!({ "author": "1.2.27", "URI": "ipfs:QmPaper" });
        assert!(tx.add_operation_json("content_cancel", data.clone()).unwrap());
        assert!(tx.add_operation_json("content_cancellation", data).unwrap());
        assert_eq!(tx.operation_count(), 2);
        assert_eq!(tx.operations()[0].name(), "content_cancellation");
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let mut tx = Transaction::new();
        let data = json!({
            "from": "1.2.27",
            "to": "1.2.24",
            "amount": { "amount": "ten", "asset_id": "1.3.0" },
            "memo": memo_json()
        });
        assert!(!tx.add_operation_json("transfer", data).unwrap());
        assert!(tx.is_empty());
    }

    #[test]
    fn test_operation_serializes_with_network_name() {
        let op = Operation::ContentCancel(ContentCancelOp::new("1.2.27", "ipfs:Qm"));
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["content_cancellation"]["URI"], "ipfs:Qm");
        assert_eq!(json["content_cancellation"]["author"], "1.2.27");
    }
}
