//! Lenient deserialization helpers.
//!
//! Exported domain payloads are produced by several generations of tooling.
//! Identifiers arrive as strings or integers, optional arrays arrive as `null`,
//! and blank strings stand in for absent values. These helpers absorb those
//! variations at the boundary.

use serde::{Deserialize, Deserializer};

/// An identifier that may be serialized as a string or a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            IdRepr::Str(s) => s,
            IdRepr::Int(n) => n.to_string(),
            IdRepr::UInt(n) => n.to_string(),
            IdRepr::Float(n) => n.to_string(),
        }
    }
}

/// Deserializes `null` (or an absent field, together with `#[serde(default)]`)
/// as `T::default()`.
///
/// # Errors
///
/// Returns the deserializer's error when the value is present but not a `T`.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a string-or-number identifier into a `String`; `null` becomes
/// the empty string.
///
/// # Errors
///
/// Returns the deserializer's error when the value is neither a string nor a number.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRepr>::deserialize(deserializer)?
        .map(IdRepr::into_string)
        .unwrap_or_default())
}

/// Deserializes an optional string-or-number identifier. Blank strings are
/// treated as absent.
///
/// # Errors
///
/// Returns the deserializer's error when the value is neither a string nor a number.
pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdRepr>::deserialize(deserializer)?
        .map(IdRepr::into_string)
        .and_then(non_blank))
}

/// Deserializes an optional string, treating blank strings as absent.
///
/// # Errors
///
/// Returns the deserializer's error when the value is present but not a string.
pub fn opt_non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(non_blank))
}

/// Returns `Some(s)` unless `s` is empty or whitespace-only.
pub fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Returns the first candidate that is present and not blank.
pub fn first_non_blank<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates.into_iter().flatten().find_map(non_blank)
}
