//! # Driven Ports (SPI - Outbound)

use crate::domain::{BatchStatus, BlockSummary, BuildError, GatewayError, SubmissionLink};
use async_trait::async_trait;
use hm_shared_types::Address;

/// Session signing key.
pub trait Signer: Send + Sync {
    /// Compressed public key, hex encoded.
    fn public_key(&self) -> String;

    /// Sign `message`, returning the compact (r || s) signature, hex encoded.
    fn sign(&self, message: &[u8]) -> Result<String, BuildError>;
}

/// The validator REST API, as seen by the client.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Submit serialized batch list bytes. Returns the status link.
    async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmissionLink, GatewayError>;

    /// Current status of the batch behind `link`.
    async fn batch_status(&self, link: &SubmissionLink) -> Result<BatchStatus, GatewayError>;

    /// Raw bytes stored at `address`, or `None` if nothing is stored there.
    async fn state(&self, address: &Address) -> Result<Option<Vec<u8>>, GatewayError>;

    /// The most recent `limit` blocks, newest first.
    async fn blocks(&self, limit: usize) -> Result<Vec<BlockSummary>, GatewayError>;
}
