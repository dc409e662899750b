//! # Ledger Simulator
//!
//! An in-process validator behind the `LedgerGateway` port. Submitted batch
//! lists are decoded, every signature and payload digest is checked, and each
//! transaction is handed to a `HangmanProcessor` over in-memory state.
//!
//! A batch whose transaction the processor rejects is `INVALID`; one that
//! applies cleanly is `COMMITTED` and lands in a new block. Clones share
//! one ledger, so several players can sit at the same table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use prost::Message;

use hm_01_transaction_processor::prelude::*;
use hm_02_envelope_builder::prelude::*;
use hm_shared_types::{sha512_hex, Address};

const LINK_PREFIX: &str = "http://ledger.test/batch_statuses?id=";

/// Validator stand-in for end-to-end tests.
#[derive(Clone)]
pub struct LedgerSimulator {
    backend: Arc<InMemoryStateBackend>,
    processor: Arc<HangmanProcessor<InMemoryStateBackend>>,
    statuses: Arc<Mutex<HashMap<String, BatchStatus>>>,
    blocks: Arc<Mutex<Vec<BlockSummary>>>,
}

impl Default for LedgerSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerSimulator {
    pub fn new() -> Self {
        let backend = Arc::new(InMemoryStateBackend::new());
        let processor = HangmanProcessor::new(Arc::clone(&backend), ProcessorConfig::default());
        Self {
            backend,
            processor: Arc::new(processor),
            statuses: Arc::default(),
            blocks: Arc::default(),
        }
    }

    pub fn backend(&self) -> &InMemoryStateBackend {
        &self.backend
    }

    pub async fn stats(&self) -> ProcessorStats {
        self.processor.stats().await
    }

    /// Check one batch and turn each transaction into a processor request.
    fn unpack(batch: &Batch) -> Result<Vec<TransactionRequest>, GatewayError> {
        let header = BatchHeader::decode(batch.header.as_slice()).map_err(bad_request)?;
        verify(&header.signer_public_key, &batch.header, &batch.header_signature)
            .map_err(bad_request)?;

        let ids: Vec<&str> = batch
            .transactions
            .iter()
            .map(|t| t.header_signature.as_str())
            .collect();
        if header.transaction_ids != ids {
            return Err(bad_request("batch header does not list its transactions"));
        }

        batch
            .transactions
            .iter()
            .map(|txn| {
                let header =
                    TransactionHeader::decode(txn.header.as_slice()).map_err(bad_request)?;
                verify(&header.signer_public_key, &txn.header, &txn.header_signature)
                    .map_err(bad_request)?;
                if header.payload_sha512 != sha512_hex(&txn.payload) {
                    return Err(bad_request("payload digest mismatch"));
                }
                Ok(TransactionRequest::new(
                    header.signer_public_key,
                    header.family_name,
                    header.family_version,
                    txn.payload.clone(),
                ))
            })
            .collect()
    }

    async fn execute(&self, requests: &[TransactionRequest]) -> Result<BatchStatus, GatewayError> {
        for request in requests {
            match self.processor.process(request).await {
                Ok(()) => {}
                Err(err) if err.is_invalid_transaction() => return Ok(BatchStatus::Invalid),
                Err(err) => {
                    return Err(GatewayError::Status {
                        status: 500,
                        body: err.to_string(),
                    })
                }
            }
        }
        Ok(BatchStatus::Committed)
    }

    fn commit_block(&self, signer: &str, batch_sizes: Vec<usize>) -> Result<(), GatewayError> {
        let mut blocks = self.blocks.lock().map_err(poisoned)?;
        let block_num = blocks.len() as u64;
        let previous_block_id = blocks
            .last()
            .map_or_else(|| "0".repeat(16), |b| b.block_id.clone());
        blocks.push(BlockSummary {
            block_num,
            block_id: sha512_hex(format!("{block_num}:{previous_block_id}").as_bytes()),
            previous_block_id,
            signer_public_key: signer.to_string(),
            batch_sizes,
        });
        Ok(())
    }
}

#[async_trait]
impl LedgerGateway for LedgerSimulator {
    async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmissionLink, GatewayError> {
        let list = BatchList::decode(batch_list.as_slice()).map_err(bad_request)?;
        let Some(batch) = list.batches.first() else {
            return Err(bad_request("empty batch list"));
        };

        let requests = Self::unpack(batch)?;
        let status = self.execute(&requests).await?;
        if status == BatchStatus::Committed {
            let signer = BatchHeader::decode(batch.header.as_slice())
                .map_err(bad_request)?
                .signer_public_key;
            self.commit_block(&signer, vec![batch.transactions.len()])?;
        }

        self.statuses
            .lock()
            .map_err(poisoned)?
            .insert(batch.header_signature.clone(), status);
        Ok(SubmissionLink(format!("{LINK_PREFIX}{}", batch.header_signature)))
    }

    async fn batch_status(&self, link: &SubmissionLink) -> Result<BatchStatus, GatewayError> {
        let id = link.as_str().trim_start_matches(LINK_PREFIX);
        let statuses = self.statuses.lock().map_err(poisoned)?;
        Ok(statuses.get(id).copied().unwrap_or(BatchStatus::Unknown))
    }

    async fn state(&self, address: &Address) -> Result<Option<Vec<u8>>, GatewayError> {
        Ok(self.backend.raw(address))
    }

    async fn blocks(&self, limit: usize) -> Result<Vec<BlockSummary>, GatewayError> {
        let blocks = self.blocks.lock().map_err(poisoned)?;
        Ok(blocks.iter().rev().take(limit).cloned().collect())
    }
}

fn bad_request(err: impl ToString) -> GatewayError {
    GatewayError::Status {
        status: 400,
        body: err.to_string(),
    }
}

fn poisoned<T>(_: T) -> GatewayError {
    GatewayError::Http("ledger lock poisoned".to_string())
}
