//! Helper functions shared across the application.

use serde::{Deserialize, Deserializer};

/// Deserialize a JSON field that must distinguish "absent" from "explicit null".
///
/// Wrap the target type in `Option<Option<T>>` and annotate the field with
/// `#[serde(default, deserialize_with = "double_option")]`:
/// a missing field deserializes to `None`, `null` to `Some(None)` and a
/// value to `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Normalize whitespace in text: collapse interior runs and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
