//! Record identifiers accepted as JSON strings or numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Renders a JSON id to text: strings verbatim, numbers in their JSON form.
/// Returns `None` for any other JSON type.
#[must_use]
pub fn opaque_id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// `deserialize_with` target for id fields.
///
/// # Errors
///
/// Fails for anything other than a string or a number.
pub fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    opaque_id_text(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a string or number id, found {value}")))
}
