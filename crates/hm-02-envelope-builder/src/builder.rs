//! # Envelope Builder
//!
//! Wraps one action in a signed one-transaction batch:
//!
//! 1. Encode the payload.
//! 2. Build the `TransactionHeader` (family, address as input and output,
//!    session key as signer and batcher, SHA-512 of the payload) and sign it.
//! 3. Build the `BatchHeader` listing the transaction id and sign it.
//! 4. Wrap both in a `BatchList`.

use crate::domain::{
    Batch, BatchHeader, BatchList, BuildError, Envelope, Transaction, TransactionHeader,
};
use crate::ports::Signer;
use hm_shared_types::{payload, sha512_hex, Action, Address, FAMILY_NAME, FAMILY_VERSION};
use prost::Message;
use tracing::debug;

/// A fresh random nonce, so identical actions yield distinct transactions.
pub fn random_nonce() -> String {
    format!("{:016x}", rand::random::<u64>())
}

/// Builds signed envelopes with one session key.
pub struct EnvelopeBuilder<S: Signer> {
    signer: S,
}

impl<S: Signer> EnvelopeBuilder<S> {
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn public_key(&self) -> String {
        self.signer.public_key()
    }

    /// Build the envelope for `(name, action, guess)` with a random nonce.
    pub fn build(&self, name: &str, action: Action, guess: &str) -> Result<Envelope, BuildError> {
        self.build_with_nonce(name, action, guess, &random_nonce())
    }

    pub fn build_with_nonce(
        &self,
        name: &str,
        action: Action,
        guess: &str,
        nonce: &str,
    ) -> Result<Envelope, BuildError> {
        let payload = payload::encode(name, action, guess)?;
        let address = Address::derive(name);
        let transaction = self.transaction(&address, payload, nonce)?;
        let transaction_id = transaction.header_signature.clone();
        let batch = self.batch(vec![transaction])?;
        let batch_id = batch.header_signature.clone();

        Ok(Envelope {
            address,
            transaction_id,
            batch_id,
            batch_list: BatchList {
                batches: vec![batch],
            },
        })
    }

    /// The header for a transaction carrying `payload` against `address`.
    pub fn transaction_header(
        &self,
        address: &Address,
        payload: &[u8],
        nonce: &str,
    ) -> TransactionHeader {
        let public_key = self.signer.public_key();
        TransactionHeader {
            batcher_public_key: public_key.clone(),
            dependencies: Vec::new(),
            family_name: FAMILY_NAME.to_string(),
            family_version: FAMILY_VERSION.to_string(),
            inputs: vec![address.to_string()],
            nonce: nonce.to_string(),
            outputs: vec![address.to_string()],
            payload_sha512: sha512_hex(payload),
            signer_public_key: public_key,
        }
    }

    fn transaction(
        &self,
        address: &Address,
        payload: Vec<u8>,
        nonce: &str,
    ) -> Result<Transaction, BuildError> {
        let header = self.transaction_header(address, &payload, nonce);
        debug!(?header, "transaction header");
        let header = header.encode_to_vec();
        let header_signature = self.signer.sign(&header)?;
        debug!(signature = %header_signature, "transaction signed");

        Ok(Transaction {
            header,
            header_signature,
            payload,
        })
    }

    fn batch(&self, transactions: Vec<Transaction>) -> Result<Batch, BuildError> {
        let header = BatchHeader {
            signer_public_key: self.signer.public_key(),
            transaction_ids: transactions
                .iter()
                .map(|t| t.header_signature.clone())
                .collect(),
        };
        debug!(?header, "batch header");
        let header = header.encode_to_vec();
        let header_signature = self.signer.sign(&header)?;
        debug!(signature = %header_signature, "batch signed");

        Ok(Batch {
            header,
            header_signature,
            transactions,
            trace: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{verify, Secp256k1Signer};
    use hm_shared_types::Payload;

    fn builder() -> EnvelopeBuilder<Secp256k1Signer> {
        EnvelopeBuilder::new(Secp256k1Signer::generate())
    }

    fn only_transaction(envelope: &Envelope) -> (&Batch, &Transaction) {
        assert_eq!(envelope.batch_list.batches.len(), 1);
        let batch = &envelope.batch_list.batches[0];
        assert_eq!(batch.transactions.len(), 1);
        (batch, &batch.transactions[0])
    }

    #[test]
    fn test_transaction_header_contents() {
        let builder = builder();
        let envelope = builder.build("g1", Action::Create, "cat").unwrap();
        let (_, txn) = only_transaction(&envelope);
        let header = TransactionHeader::decode(txn.header.as_slice()).unwrap();

        let address = Address::derive("g1").to_string();
        assert_eq!(header.family_name, "hm");
        assert_eq!(header.family_version, "1.0");
        assert_eq!(header.inputs, vec![address.clone()]);
        assert_eq!(header.outputs, vec![address]);
        assert_eq!(header.signer_public_key, builder.public_key());
        assert_eq!(header.batcher_public_key, builder.public_key());
        assert!(header.dependencies.is_empty());
        assert_eq!(header.payload_sha512, sha512_hex(&txn.payload));
        assert_eq!(header.payload_sha512.len(), 128);
    }

    #[test]
    fn test_payload_decodes_back() {
        let envelope = builder().build("g1", Action::Guess, "e").unwrap();
        let (_, txn) = only_transaction(&envelope);
        assert_eq!(Payload::decode(&txn.payload).unwrap(), Payload::guess("g1", 'e'));
    }

    #[test]
    fn test_signatures_verify() {
        let builder = builder();
        let envelope = builder.build("g1", Action::Delete, "").unwrap();
        let (batch, txn) = only_transaction(&envelope);
        let key = builder.public_key();

        verify(&key, &txn.header, &txn.header_signature).unwrap();
        verify(&key, &batch.header, &batch.header_signature).unwrap();
        assert_eq!(envelope.transaction_id, txn.header_signature);
        assert_eq!(envelope.batch_id, batch.header_signature);
    }

    #[test]
    fn test_batch_header_lists_the_transaction() {
        let builder = builder();
        let envelope = builder.build("g1", Action::Create, "cat").unwrap();
        let (batch, txn) = only_transaction(&envelope);
        let header = BatchHeader::decode(batch.header.as_slice()).unwrap();
        assert_eq!(header.transaction_ids, vec![txn.header_signature.clone()]);
        assert_eq!(header.signer_public_key, builder.public_key());
    }

    #[test]
    fn test_bytes_are_a_batch_list() {
        let envelope = builder().build("g1", Action::Create, "cat").unwrap();
        let decoded = BatchList::decode(envelope.to_bytes().as_slice()).unwrap();
        assert_eq!(decoded, envelope.batch_list);
    }

    #[test]
    fn test_nonce_distinguishes_identical_actions() {
        let builder = builder();
        let a = builder.build("g1", Action::Guess, "a").unwrap();
        let b = builder.build("g1", Action::Guess, "a").unwrap();
        assert_ne!(a.transaction_id, b.transaction_id);

        let c = builder.build_with_nonce("g1", Action::Guess, "a", "00").unwrap();
        let d = builder.build_with_nonce("g1", Action::Guess, "a", "00").unwrap();
        assert_eq!(c.transaction_id, d.transaction_id);
    }
}
