//! JSON bodies of the validator REST API.

use crate::domain::{BatchStatus, BlockSummary, GatewayError};
use serde::Deserialize;

/// Reply to `POST /batches`.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub link: Option<String>,
}

/// Reply to `GET /batch_statuses`.
#[derive(Debug, Deserialize)]
pub struct BatchStatusesResponse {
    #[serde(default)]
    pub data: Vec<BatchStatusEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BatchStatusEntry {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub invalid_transactions: Vec<InvalidTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct InvalidTransaction {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

impl BatchStatusesResponse {
    /// Status of the first (only) batch. An empty reply is `Unknown`.
    pub fn status(&self) -> BatchStatus {
        self.data
            .first()
            .and_then(|entry| entry.status.parse().ok())
            .unwrap_or(BatchStatus::Unknown)
    }
}

/// Reply to `GET /state/{address}`.
#[derive(Debug, Deserialize)]
pub struct StateResponse {
    /// Base64 of the stored bytes.
    pub data: String,
}

/// Reply to `GET /blocks`.
#[derive(Debug, Deserialize)]
pub struct BlockListResponse {
    #[serde(default)]
    pub data: Vec<BlockEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BlockEntry {
    pub header: BlockHeaderEntry,
    pub header_signature: String,
    #[serde(default)]
    pub batches: Vec<BlockBatchEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BlockHeaderEntry {
    /// Decimal string, as the REST API renders 64-bit integers.
    pub block_num: String,
    #[serde(default)]
    pub previous_block_id: String,
    #[serde(default)]
    pub signer_public_key: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockBatchEntry {
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}

impl TryFrom<BlockEntry> for BlockSummary {
    type Error = GatewayError;

    fn try_from(entry: BlockEntry) -> Result<Self, Self::Error> {
        let block_num = entry.header.block_num.parse().map_err(|_| {
            GatewayError::Parse(format!("invalid block_num '{}'", entry.header.block_num))
        })?;
        Ok(BlockSummary {
            block_num,
            block_id: entry.header_signature,
            previous_block_id: entry.header.previous_block_id,
            signer_public_key: entry.header.signer_public_key,
            batch_sizes: entry.batches.iter().map(|b| b.transactions.len()).collect(),
        })
    }
}

/// Error body the REST API attaches to non-2xx replies.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// `"title: message"`, or whichever half is present. `None` if both are empty.
    pub fn describe(&self) -> Option<String> {
        let ErrorDetail { title, message } = &self.error;
        match (title.is_empty(), message.is_empty()) {
            (true, true) => None,
            (false, true) => Some(title.clone()),
            (true, false) => Some(message.clone()),
            (false, false) => Some(format!("{title}: {message}")),
        }
    }
}
