//! # Address Derivation
//!
//! Maps a game name to its storage address inside the reserved `hm`
//! namespace.
//!
//! ```text
//! address = sha512("hangman")[..6] ++ sha512(name)[..64]     (hex chars)
//!         = "b89bcb" ++ 64 hex chars                         (70 total)
//! ```
//!
//! Derivation is total and deterministic. Two names share an address only on
//! a SHA-512 prefix collision, which is not handled specially.

use crate::errors::AddressError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;

/// Application identifier the namespace is derived from.
pub const APP_NAME: &str = "hangman";

/// Namespace prefix, the first 6 hex chars of `sha512(APP_NAME)`.
pub const NAMESPACE: &str = "b89bcb";

/// Length of the namespace prefix in hex chars.
pub const NAMESPACE_LEN: usize = 6;

/// Length of the per-name hash suffix in hex chars.
pub const NAME_HASH_LEN: usize = 64;

/// Total address length in hex chars.
pub const ADDRESS_LEN: usize = NAMESPACE_LEN + NAME_HASH_LEN;

/// Hex-encoded SHA-512 digest.
pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

/// Namespace prefix for an arbitrary application identifier.
pub fn namespace_for(app_name: &str) -> String {
    let mut digest = sha512_hex(app_name.as_bytes());
    digest.truncate(NAMESPACE_LEN);
    digest
}

/// A 70-character lower-case hex storage address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Derive the address of a game from its name.
    pub fn derive(name: &str) -> Self {
        let digest = sha512_hex(name.as_bytes());
        let mut address = String::with_capacity(ADDRESS_LEN);
        address.push_str(NAMESPACE);
        address.push_str(&digest[..NAME_HASH_LEN]);
        Self(address)
    }

    /// Parse an address received from outside (REST API, event feed).
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if raw.len() != ADDRESS_LEN {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: raw.len(),
            });
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(AddressError::NotHex(raw.to_string()));
        }
        if !raw.starts_with(NAMESPACE) {
            return Err(AddressError::WrongNamespace {
                found: raw[..NAMESPACE_LEN].to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace prefix of this address.
    pub fn namespace(&self) -> &str {
        &self.0[..NAMESPACE_LEN]
    }

    pub fn is_in_namespace(&self) -> bool {
        self.namespace() == NAMESPACE
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}
