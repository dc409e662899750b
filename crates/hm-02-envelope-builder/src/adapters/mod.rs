//! # Adapters Layer (Outer Hexagon)
//!
//! - `secp256k1`: k256-backed `Signer`
//! - `rest_api`: reqwest-backed `LedgerGateway`

pub mod rest_api;
pub mod secp256k1;
pub mod types;

pub use rest_api::RestApiClient;
pub use secp256k1::{verify, Secp256k1Signer};
