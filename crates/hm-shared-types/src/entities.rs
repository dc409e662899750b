//! # Game Entities
//!
//! The `Game` snapshot and the append-only `SnapshotLog` stored at a game
//! address.
//!
//! ## Record Layout
//!
//! A snapshot is a CBOR map with keys `name`, `word`, `hits`, `misses`,
//! `host`, `guesser`, `state`. Letter sets are written as strings in the
//! order the letters were guessed and `state` as `1`/`2`/`3`. Records from
//! earlier versions that lack `hits`, `guesser` or `state` decode with
//! empty / ongoing defaults.
//!
//! The value stored at an address is a CBOR array of snapshots, oldest first.
//! Appending never re-encodes earlier snapshots through `Game`, so records
//! written by older versions keep their exact fields.

use crate::cbor;
use crate::errors::RecordError;
use ciborium::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Number of misses after which a game is lost.
pub const MAX_MISSES: usize = 6;

/// Case-fold a guessed or secret letter.
pub fn fold_letter(letter: char) -> char {
    letter.to_lowercase().next().unwrap_or(letter)
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Lifecycle of a game. `Won` and `Lost` are absorbing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameState {
    #[default]
    Ongoing,
    Won,
    Lost,
}

impl GameState {
    /// Wire code of the state.
    pub const fn code(self) -> u8 {
        match self {
            GameState::Ongoing => 1,
            GameState::Won => 2,
            GameState::Lost => 3,
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameState::Ongoing)
    }
}

impl From<GameState> for u8 {
    fn from(state: GameState) -> Self {
        state.code()
    }
}

impl TryFrom<u8> for GameState {
    type Error = RecordError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(GameState::Ongoing),
            2 => Ok(GameState::Won),
            3 => Ok(GameState::Lost),
            other => Err(RecordError::UnknownState(other)),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameState::Ongoing => "ONGOING",
            GameState::Won => "WON",
            GameState::Lost => "LOST",
        };
        f.write_str(label)
    }
}

// =============================================================================
// LETTER SET
// =============================================================================

/// Set of folded letters that remembers guess order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LetterSet(Vec<char>);

impl LetterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a letter (folded). Returns `false` if it was already present.
    pub fn insert(&mut self, letter: char) -> bool {
        let letter = fold_letter(letter);
        if self.0.contains(&letter) {
            return false;
        }
        self.0.push(letter);
        true
    }

    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(&fold_letter(letter))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Letters in guess order, as stored on the wire.
    pub fn as_string(&self) -> String {
        self.0.iter().collect()
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = LetterSet::new();
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

impl Serialize for LetterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for LetterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.chars().collect())
    }
}

/// An unset guesser travels as the empty string.
mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}

// =============================================================================
// GAME
// =============================================================================

/// One immutable snapshot of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub name: String,
    pub word: String,
    #[serde(default)]
    pub hits: LetterSet,
    #[serde(default)]
    pub misses: LetterSet,
    /// Public key (hex) of the creator.
    #[serde(default)]
    pub host: String,
    /// Public key (hex) of whoever made the latest accepted guess.
    #[serde(default, with = "blank_as_none")]
    pub guesser: Option<String>,
    #[serde(default)]
    pub state: GameState,
}

impl Game {
    /// A fresh, ongoing game with no guesses.
    pub fn new(name: impl Into<String>, word: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            word: word.into(),
            hits: LetterSet::new(),
            misses: LetterSet::new(),
            host: host.into(),
            guesser: None,
            state: GameState::Ongoing,
        }
    }

    /// Distinct folded letters of the secret word.
    pub fn letters(&self) -> BTreeSet<char> {
        self.word
            .chars()
            .filter(|c| c.is_alphabetic())
            .map(fold_letter)
            .collect()
    }

    pub fn word_contains(&self, letter: char) -> bool {
        let letter = fold_letter(letter);
        self.word.chars().any(|c| fold_letter(c) == letter)
    }

    /// Whether the letter has been guessed before, hit or miss.
    pub fn is_guessed(&self, letter: char) -> bool {
        self.hits.contains(letter) || self.misses.contains(letter)
    }

    /// Every distinct letter of the word has been hit.
    pub fn is_solved(&self) -> bool {
        self.letters().iter().all(|&c| self.hits.contains(c))
    }

    pub fn remaining_misses(&self) -> usize {
        MAX_MISSES.saturating_sub(self.misses.len())
    }

    /// The word with every letter not yet hit replaced by `_`.
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|c| {
                if c.is_alphabetic() && !self.hits.contains(c) {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    }
}

// =============================================================================
// SNAPSHOT LOG
// =============================================================================

/// Append-only history of a game, oldest snapshot first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotLog {
    snapshots: Vec<Game>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the bytes stored at an address. Empty bytes are an empty log.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        cbor::from_slice_exact(bytes).map_err(RecordError::Malformed)
    }

    /// Append `snapshot` to the log encoded in `bytes`.
    ///
    /// Earlier entries are carried over as stored values; only the new
    /// snapshot is written from a `Game`.
    pub fn append_to_bytes(bytes: &[u8], snapshot: &Game) -> Result<Vec<u8>, RecordError> {
        let mut entries: Vec<Value> = if bytes.is_empty() {
            Vec::new()
        } else {
            cbor::from_slice_exact(bytes).map_err(RecordError::Malformed)?
        };
        let entry = Value::serialized(snapshot).map_err(|e| RecordError::Encoding(e.to_string()))?;
        entries.push(entry);

        let mut out = Vec::with_capacity(bytes.len() + 128);
        ciborium::into_writer(&entries, &mut out)
            .map_err(|e| RecordError::Encoding(e.to_string()))?;
        Ok(out)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)
            .map_err(|e| RecordError::Encoding(e.to_string()))?;
        Ok(bytes)
    }

    /// The current state of the game (last snapshot).
    pub fn current(&self) -> Option<&Game> {
        self.snapshots.last()
    }

    pub fn into_current(mut self) -> Option<Game> {
        self.snapshots.pop()
    }

    pub fn append(&mut self, snapshot: Game) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Game> {
        self.snapshots.iter()
    }
}
