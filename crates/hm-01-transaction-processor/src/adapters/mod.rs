//! # Adapters Layer (Outer Hexagon)
//!
//! Implementations of the outbound ports. Only the in-memory backend lives
//! here; the validator-side context is provided by the ledger runtime.

pub mod memory_backend;

pub use memory_backend::*;
