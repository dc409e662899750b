//! # Ports Layer (Middle Hexagon)
//!
//! The client depends on a `Signer` for its session key and a `LedgerGateway`
//! for everything that crosses the network.

pub mod outbound;

pub use outbound::*;
