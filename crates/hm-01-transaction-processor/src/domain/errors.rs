use hm_shared_types::GameState;
use thiserror::Error;

/// A move the game rules refuse.
///
/// Rejections are deterministic: every validator reaches the same verdict for
/// the same history, so the transaction is marked invalid rather than retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Game already exists: {name}")]
    AlreadyExists { name: String },

    #[error("Game not found: {name}")]
    NotFound { name: String },

    #[error("Game '{name}' has already ended: {state}")]
    GameEnded { name: String, state: GameState },

    #[error("Letter '{letter}' was already guessed in game '{name}'")]
    AlreadyGuessed { name: String, letter: char },
}
