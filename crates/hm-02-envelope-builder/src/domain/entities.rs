use super::records::BatchList;
use hm_shared_types::Address;
use prost::Message;
use std::fmt;
use std::str::FromStr;

/// Commit status of a submitted batch as reported by the REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BatchStatus {
    Pending,
    Committed,
    Invalid,
    Unknown,
}

impl BatchStatus {
    /// Whether polling can stop. `Unknown` is final too: the validator has
    /// no record of the batch and will not acquire one by waiting.
    pub const fn is_final(self) -> bool {
        !matches!(self, BatchStatus::Pending)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BatchStatus::Pending => "PENDING",
            BatchStatus::Committed => "COMMITTED",
            BatchStatus::Invalid => "INVALID",
            BatchStatus::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for BatchStatus {
    type Err = std::convert::Infallible;

    /// Unrecognized status strings map to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PENDING" => BatchStatus::Pending,
            "COMMITTED" => BatchStatus::Committed,
            "INVALID" => BatchStatus::Invalid,
            _ => BatchStatus::Unknown,
        })
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status URL returned by the REST API for a submitted batch list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubmissionLink(pub String);

impl SubmissionLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed one-transaction batch list, ready to submit.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Address the transaction reads and writes.
    pub address: Address,
    /// Header signature of the transaction.
    pub transaction_id: String,
    /// Header signature of the batch.
    pub batch_id: String,
    pub batch_list: BatchList,
}

impl Envelope {
    /// Protobuf bytes of the batch list.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.batch_list.encode_to_vec()
    }
}

/// What the client learned from one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub link: SubmissionLink,
    pub address: Address,
    pub transaction_id: String,
    pub batch_id: String,
}

/// Block listing entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSummary {
    pub block_num: u64,
    pub block_id: String,
    pub previous_block_id: String,
    pub signer_public_key: String,
    /// Number of transactions in each batch, in block order.
    pub batch_sizes: Vec<usize>,
}

impl BlockSummary {
    pub fn batch_count(&self) -> usize {
        self.batch_sizes.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.batch_sizes.iter().sum()
    }
}
