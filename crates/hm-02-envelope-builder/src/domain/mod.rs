//! # Domain Layer (Inner Hexagon)
//!
//! Wire records, client-side entities and errors. No I/O.

pub mod entities;
pub mod errors;
pub mod records;

pub use entities::*;
pub use errors::*;
pub use records::*;
