//! # Game Rules
//!
//! `apply` is the whole state machine:
//!
//! | Action   | Current game          | Result                         |
//! |----------|-----------------------|--------------------------------|
//! | `create` | absent                | `Append(new ONGOING game)`     |
//! | `create` | present               | `AlreadyExists`                |
//! | `delete` | present               | `Remove`                       |
//! | `delete` | absent                | `NotFound`                     |
//! | `guess`  | absent                | `NotFound`                     |
//! | `guess`  | `WON` / `LOST`        | `GameEnded`                    |
//! | `guess`  | letter in hits/misses | `AlreadyGuessed`               |
//! | `guess`  | otherwise             | `Append(next snapshot)`        |
//!
//! The previous snapshot is never modified; a guess clones it and appends.

use super::errors::GameError;
use hm_shared_types::{fold_letter, Action, Game, GameState, Payload, PayloadError, MAX_MISSES};

/// A validated player move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameAction {
    Create { word: String },
    Delete,
    Guess { letter: char },
}

impl GameAction {
    /// Lift a decoded payload into a move.
    pub fn from_payload(payload: &Payload) -> Result<Self, PayloadError> {
        payload.validate()?;
        match payload.action {
            Action::Create => Ok(GameAction::Create {
                word: payload.guess.clone(),
            }),
            Action::Delete => Ok(GameAction::Delete),
            Action::Guess => payload
                .letter()
                .map(|letter| GameAction::Guess { letter })
                .ok_or_else(|| PayloadError::InvalidGuess {
                    name: payload.name.clone(),
                    guess: payload.guess.clone(),
                }),
        }
    }

    pub fn action(&self) -> Action {
        match self {
            GameAction::Create { .. } => Action::Create,
            GameAction::Delete => Action::Delete,
            GameAction::Guess { .. } => Action::Guess,
        }
    }
}

/// What the store must do with the outcome of a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Append this snapshot to the game's history.
    Append(Game),
    /// Clear the game's address.
    Remove,
}

/// Apply `action` by `signer` to the game `name`, whose latest snapshot is
/// `current`.
pub fn apply(
    name: &str,
    current: Option<&Game>,
    action: &GameAction,
    signer: &str,
) -> Result<Transition, GameError> {
    match (action, current) {
        (GameAction::Create { .. }, Some(_)) => Err(GameError::AlreadyExists {
            name: name.to_string(),
        }),
        (GameAction::Create { word }, None) => {
            Ok(Transition::Append(Game::new(name, word.as_str(), signer)))
        }
        (GameAction::Delete, Some(_)) => Ok(Transition::Remove),
        (GameAction::Delete | GameAction::Guess { .. }, None) => Err(GameError::NotFound {
            name: name.to_string(),
        }),
        (GameAction::Guess { letter }, Some(game)) => {
            guess(name, game, *letter, signer).map(Transition::Append)
        }
    }
}

fn guess(name: &str, game: &Game, letter: char, signer: &str) -> Result<Game, GameError> {
    if game.state.is_terminal() {
        return Err(GameError::GameEnded {
            name: name.to_string(),
            state: game.state,
        });
    }

    let letter = fold_letter(letter);
    if game.is_guessed(letter) {
        return Err(GameError::AlreadyGuessed {
            name: name.to_string(),
            letter,
        });
    }

    let mut next = game.clone();
    if next.word_contains(letter) {
        next.hits.insert(letter);
    } else {
        next.misses.insert(letter);
    }
    next.guesser = Some(signer.to_string());
    next.state = next_state(&next);
    Ok(next)
}

fn next_state(game: &Game) -> GameState {
    if game.is_solved() {
        GameState::Won
    } else if game.misses.len() >= MAX_MISSES {
        GameState::Lost
    } else {
        GameState::Ongoing
    }
}
