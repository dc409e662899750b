//! Strict CBOR reading shared by the payload and record codecs.

use serde::de::DeserializeOwned;
use std::io::Cursor;

/// Decode exactly one CBOR item spanning all of `bytes`.
///
/// Trailing bytes after the item are an error, so one value has one
/// encoding up to map key order.
pub(crate) fn from_slice_exact<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    let mut cursor = Cursor::new(bytes);
    let value = ciborium::from_reader(&mut cursor).map_err(|e| e.to_string())?;
    let consumed = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
    if consumed != bytes.len() {
        return Err(format!(
            "{} trailing bytes after the CBOR item",
            bytes.len().saturating_sub(consumed)
        ));
    }
    Ok(value)
}
