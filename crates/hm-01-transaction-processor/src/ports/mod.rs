//! # Ports Layer (Middle Hexagon)
//!
//! - `inbound`: the API the ledger's execution context drives.
//! - `outbound`: the state backend the processor depends on.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
