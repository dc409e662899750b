//! # Domain Layer (Inner Hexagon)
//!
//! Pure game rules. Nothing here performs I/O: `rules::apply` maps the current
//! snapshot and an action to the next state transition, or a rejection.

pub mod errors;
pub mod rules;

pub use errors::*;
pub use rules::*;
