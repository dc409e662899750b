//! # secp256k1 Session Key
//!
//! ECDSA over secp256k1 with SHA-256 message digests, the scheme the
//! validator checks header signatures with.
//!
//! - RFC 6979 deterministic nonces
//! - Low-S normalized signatures
//! - Public keys in 33-byte compressed SEC1 form

use crate::domain::BuildError;
use crate::ports::Signer;
use k256::ecdsa::{
    signature::{Signer as _, Verifier},
    Signature, SigningKey, VerifyingKey,
};

/// A secp256k1 signing key held for the session.
pub struct Secp256k1Signer {
    signing_key: SigningKey,
}

impl Secp256k1Signer {
    /// Generate a random key for this session.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Load a key from 32 secret bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BuildError> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|e| BuildError::InvalidKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Load a key from 64 hex chars. Surrounding whitespace is ignored, so
    /// the contents of a key file can be passed directly.
    pub fn from_hex(private_key: &str) -> Result<Self, BuildError> {
        let bytes = hex::decode(private_key.trim())
            .map_err(|e| BuildError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Secret key as hex, for saving the session key.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Compressed public key bytes (33 bytes).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_sec1_bytes().to_vec()
    }
}

impl Signer for Secp256k1Signer {
    fn public_key(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    fn sign(&self, message: &[u8]) -> Result<String, BuildError> {
        let signature: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| BuildError::Signing(e.to_string()))?;
        Ok(hex::encode(signature.to_bytes()))
    }
}

/// Check a hex signature produced by `Signer::sign` against a hex public key.
pub fn verify(public_key: &str, message: &[u8], signature: &str) -> Result<(), BuildError> {
    let key_bytes =
        hex::decode(public_key).map_err(|e| BuildError::Verification(e.to_string()))?;
    let verifying_key = VerifyingKey::from_sec1_bytes(&key_bytes)
        .map_err(|e| BuildError::Verification(e.to_string()))?;

    let sig_bytes = hex::decode(signature).map_err(|e| BuildError::Verification(e.to_string()))?;
    let sig =
        Signature::from_slice(&sig_bytes).map_err(|e| BuildError::Verification(e.to_string()))?;

    verifying_key
        .verify(message, &sig)
        .map_err(|e| BuildError::Verification(e.to_string()))
}
