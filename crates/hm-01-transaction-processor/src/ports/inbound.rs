//! # Driving Ports (API - Inbound)
//!
//! The validator hands each `hm` transaction to a `TransactionHandler`. The
//! handler advertises which family, versions and namespaces it serves so the
//! validator can route to it.

use crate::errors::ProcessError;
use async_trait::async_trait;

/// The parts of a transaction header the processor reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestHeader {
    /// Compressed secp256k1 public key of the signer, hex encoded.
    pub signer_public_key: String,
    pub family_name: String,
    pub family_version: String,
}

/// One transaction as delivered by the validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub header: RequestHeader,
    /// Raw CBOR action payload.
    pub payload: Vec<u8>,
}

impl TransactionRequest {
    pub fn new(
        signer_public_key: impl Into<String>,
        family_name: impl Into<String>,
        family_version: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            header: RequestHeader {
                signer_public_key: signer_public_key.into(),
                family_name: family_name.into(),
                family_version: family_version.into(),
            },
            payload,
        }
    }
}

/// Entry point of a transaction family.
#[async_trait]
pub trait TransactionHandler: Send + Sync {
    fn family_name(&self) -> &str;

    fn family_versions(&self) -> Vec<String>;

    /// Address prefixes this family may read and write.
    fn namespaces(&self) -> Vec<String>;

    /// Validate and apply a transaction.
    ///
    /// Errors for which `ProcessError::is_invalid_transaction` holds mark the
    /// transaction invalid; any other error is an internal failure the
    /// validator may retry.
    async fn apply(&self, request: &TransactionRequest) -> Result<(), ProcessError>;
}
