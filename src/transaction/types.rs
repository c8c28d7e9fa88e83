/// Operation types for DECENT transactions
use crate::asset::{Asset, RegionalPrice};
use crate::crypt::content::ContentKey;
use crate::crypt::elgamal::{ElGamalPublic, KeyParts};
use crate::transaction::memo::Memo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed catalogue of operation kinds this SDK can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Transfer,
    ContentCancel,
    BuyContent,
    SubmitContent,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Transfer,
        OperationKind::ContentCancel,
        OperationKind::BuyContent,
        OperationKind::SubmitContent,
    ];

    /// Network name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Transfer => "transfer",
            OperationKind::ContentCancel => "content_cancellation",
            OperationKind::BuyContent => "request_to_buy",
            OperationKind::SubmitContent => "content_submit",
        }
    }

    /// Looks up a kind by network name; SDK-style aliases are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "transfer" => Some(OperationKind::Transfer),
            "content_cancellation" | "content_cancel" => Some(OperationKind::ContentCancel),
            "request_to_buy" | "buy_content" => Some(OperationKind::BuyContent),
            "content_submit" | "submit_content" => Some(OperationKind::SubmitContent),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation inside a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "transfer")]
    Transfer(TransferOp),
    #[serde(rename = "content_cancellation")]
    ContentCancel(ContentCancelOp),
    #[serde(rename = "request_to_buy")]
    BuyContent(BuyContentOp),
    #[serde(rename = "content_submit")]
    SubmitContent(SubmitContentOp),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Transfer(_) => OperationKind::Transfer,
            Operation::ContentCancel(_) => OperationKind::ContentCancel,
            Operation::BuyContent(_) => OperationKind::BuyContent,
            Operation::SubmitContent(_) => OperationKind::SubmitContent,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn fee(&self) -> &Asset {
        match self {
            Operation::Transfer(op) => &op.fee,
            Operation::ContentCancel(op) => &op.fee,
            Operation::BuyContent(op) => &op.fee,
            Operation::SubmitContent(op) => &op.fee,
        }
    }

    pub fn set_fee(&mut self, fee: Asset) {
        match self {
            Operation::Transfer(op) => op.fee = fee,
            Operation::ContentCancel(op) => op.fee = fee,
            Operation::BuyContent(op) => op.fee = fee,
            Operation::SubmitContent(op) => op.fee = fee,
        }
    }

    /// Parses the untyped `data` object of an operation named `name`.
    pub fn from_json(name: &str, data: serde_json::Value) -> Option<Result<Self, serde_json::Error>> {
        let kind = OperationKind::from_name(name)?;
        Some(match kind {
            OperationKind::Transfer => serde_json::from_value(data).map(Operation::Transfer),
            OperationKind::ContentCancel => {
                serde_json::from_value(data).map(Operation::ContentCancel)
            }
            OperationKind::BuyContent => serde_json::from_value(data).map(Operation::BuyContent),
            OperationKind::SubmitContent => {
                serde_json::from_value(data).map(Operation::SubmitContent)
            }
        })
    }
}

/// Moves `amount` from one account to another with an encrypted memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOp {
    pub from: String,
    pub to: String,
    pub amount: Asset,
    pub memo: Memo,
    #[serde(default)]
    pub fee: Asset,
}

impl TransferOp {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Asset, memo: Memo) -> Self {
        TransferOp {
            from: from.into(),
            to: to.into(),
            amount,
            memo,
            fee: Asset::default(),
        }
    }
}

/// Withdraws published content. Authorship is checked by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCancelOp {
    pub author: String,
    #[serde(rename = "URI")]
    pub uri: String,
    #[serde(default)]
    pub fee: Asset,
}

impl ContentCancelOp {
    pub fn new(author: impl Into<String>, uri: impl Into<String>) -> Self {
        ContentCancelOp {
            author: author.into(),
            uri: uri.into(),
            fee: Asset::default(),
        }
    }
}

/// Requests to buy content; `pub_key` receives the delivered content key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyContentOp {
    #[serde(rename = "URI")]
    pub uri: String,
    pub consumer: String,
    pub price: Asset,
    pub region_code_from: u32,
    #[serde(rename = "pubKey")]
    pub pub_key: ElGamalPublic,
    #[serde(default)]
    pub fee: Asset,
}

impl BuyContentOp {
    pub fn new(
        uri: impl Into<String>,
        consumer: impl Into<String>,
        price: Asset,
        region_code_from: u32,
        pub_key: ElGamalPublic,
    ) -> Self {
        BuyContentOp {
            uri: uri.into(),
            consumer: consumer.into(),
            price,
            region_code_from,
            pub_key,
            fee: Asset::default(),
        }
    }
}

/// Revenue share of a co-author, in basis points (10000 = 100%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoAuthor {
    pub account: String,
    pub basis_points: u32,
}

/// Publishes content; one key part per seeder, any `quorum` of which
/// reconstruct the content key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitContentOp {
    pub size: u64,
    pub author: String,
    pub co_authors: Vec<CoAuthor>,
    #[serde(rename = "URI")]
    pub uri: String,
    pub quorum: u32,
    pub price: Vec<RegionalPrice>,
    pub hash: String,
    pub seeders: Vec<String>,
    pub key_parts: Vec<KeyParts>,
    pub expiration: DateTime<Utc>,
    pub publishing_fee: Asset,
    pub synopsis: String,
    #[serde(default)]
    pub fee: Asset,
}

/// A seeder chosen to store content, with the ElGamal key its key part is
/// encrypted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seeder {
    pub account: String,
    pub elgamal_public: ElGamalPublic,
}

/// Everything a [`SubmitContentOp`] needs apart from the key parts, which
/// are derived from `content_key` and the seeders.
#[derive(Debug, Clone)]
pub struct ContentSubmission {
    pub size: u64,
    pub author: String,
    pub co_authors: Vec<CoAuthor>,
    pub uri: String,
    pub quorum: u32,
    pub price: Vec<RegionalPrice>,
    pub hash: String,
    pub seeders: Vec<Seeder>,
    pub content_key: ContentKey,
    pub expiration: DateTime<Utc>,
    pub publishing_fee: Asset,
    pub synopsis: String,
}

impl ContentSubmission {
    /// Splits the content key for the seeders and builds the operation.
    pub fn into_operation(self) -> crate::error::Result<SubmitContentOp> {
        let seeder_keys: Vec<ElGamalPublic> = self
            .seeders
            .iter()
            .map(|s| s.elgamal_public.clone())
            .collect();
        let key_parts =
            crate::crypt::content::split_content_key(&self.content_key, self.quorum, &seeder_keys)?;

        Ok(SubmitContentOp {
            size: self.size,
            author: self.author,
            co_authors: self.co_authors,
            uri: self.uri,
            quorum: self.quorum,
            price: self.price,
            hash: self.hash,
            seeders: self.seeders.into_iter().map(|s| s.account).collect(),
            key_parts,
            expiration: self.expiration,
            publishing_fee: self.publishing_fee,
            synopsis: self.synopsis,
            fee: Asset::default(),
        })
    }
}
