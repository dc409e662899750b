//! # Action Payload Codec
//!
//! The transaction payload is a CBOR map with exactly three text fields:
//!
//! | key      | value                                        |
//! |----------|----------------------------------------------|
//! | `name`   | game name (non-empty, no `|`)                |
//! | `action` | `create`, `delete` or `guess`                |
//! | `guess`  | word for `create`, letter for `guess`, else `""` |
//!
//! Field names travel with the data, so records written by older clients
//! decode unchanged. `decode` performs the full validation the processor
//! relies on; `encode` only serializes.

use crate::address::Address;
use crate::cbor;
use crate::errors::PayloadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved delimiter that game names may not contain.
pub const NAME_DELIMITER: char = '|';

/// Player action carried by a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Delete,
    Guess,
}

impl Action {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Delete => "delete",
            Action::Guess => "guess",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "delete" => Ok(Action::Delete),
            "guess" => Ok(Action::Guess),
            "" => Err(PayloadError::MissingAction),
            other => Err(PayloadError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Serialize)]
struct WirePayloadRef<'a> {
    name: &'a str,
    action: &'a str,
    guess: &'a str,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WirePayload {
    name: Option<String>,
    action: Option<String>,
    guess: Option<String>,
}

/// A decoded and validated action payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub name: String,
    pub action: Action,
    /// Word for `create`, letter for `guess`, empty for `delete`.
    pub guess: String,
}

impl Payload {
    pub fn new(name: impl Into<String>, action: Action, guess: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action,
            guess: guess.into(),
        }
    }

    pub fn create(name: impl Into<String>, word: impl Into<String>) -> Self {
        Self::new(name, Action::Create, word)
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self::new(name, Action::Delete, "")
    }

    pub fn guess(name: impl Into<String>, letter: char) -> Self {
        Self::new(name, Action::Guess, letter.to_string())
    }

    /// Storage address of the game this payload targets.
    pub fn address(&self) -> Address {
        Address::derive(&self.name)
    }

    /// The guessed letter, if this is a well-formed `guess` payload.
    pub fn letter(&self) -> Option<char> {
        single_letter(&self.guess)
    }

    /// Serialize to the CBOR wire form.
    pub fn encode(&self) -> Result<Vec<u8>, PayloadError> {
        encode(&self.name, self.action, &self.guess)
    }

    /// Deserialize and validate the CBOR wire form.
    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        decode(bytes)
    }

    /// Check the rules every accepted payload satisfies.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.name.is_empty() {
            return Err(PayloadError::MissingName);
        }
        if self.name.contains(NAME_DELIMITER) {
            return Err(PayloadError::NameContainsDelimiter {
                name: self.name.clone(),
            });
        }
        match self.action {
            Action::Create if !self.guess.chars().any(char::is_alphabetic) => {
                Err(PayloadError::MissingWord {
                    name: self.name.clone(),
                })
            }
            Action::Guess if self.letter().is_none() => Err(PayloadError::InvalidGuess {
                name: self.name.clone(),
                guess: self.guess.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// Encode `(name, action, guess)` as a CBOR map.
pub fn encode(name: &str, action: Action, guess: &str) -> Result<Vec<u8>, PayloadError> {
    let wire = WirePayloadRef {
        name,
        action: action.as_str(),
        guess,
    };
    let mut bytes = Vec::with_capacity(32 + name.len() + guess.len());
    ciborium::into_writer(&wire, &mut bytes)
        .map_err(|e| PayloadError::Encoding(e.to_string()))?;
    Ok(bytes)
}

/// Decode a CBOR payload, failing on malformed bytes, missing fields, keys
/// other than the three above, or bytes left over after the map.
pub fn decode(bytes: &[u8]) -> Result<Payload, PayloadError> {
    let wire: WirePayload = cbor::from_slice_exact(bytes).map_err(PayloadError::Malformed)?;

    let name = wire.name.unwrap_or_default();
    if name.is_empty() {
        return Err(PayloadError::MissingName);
    }
    let action: Action = wire.action.as_deref().unwrap_or_default().parse()?;
    let payload = Payload {
        name,
        action,
        guess: wire.guess.unwrap_or_default(),
    };
    payload.validate()?;
    Ok(payload)
}

fn single_letter(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Some(c),
        _ => None,
    }
}
