//! Client to processor integration.

pub mod flows;
pub mod ledger;

pub use ledger::LedgerSimulator;
