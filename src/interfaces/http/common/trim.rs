//! Serde helpers that normalise free-text input before it is validated

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string with surrounding whitespace removed.
/// Use together with `#[serde(default)]` so a missing field stays `None`.
pub fn trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|value| value.trim().to_string()))
}
