pub mod calc;
pub mod review;
pub mod suggest;

use serde::de::DeserializeOwned;
use serde_json::Value;

use tally_suggest_core::Suggestion;

/// Pull a suggestion list out of a bare array, a `generate` envelope
/// (`result.suggestions`) or a `review` result (`suggestions`).
pub fn suggestions_from(value: Value) -> Result<Vec<Suggestion>, Box<dyn std::error::Error>> {
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Object(mut result)) => result
                .remove("suggestions")
                .ok_or("input envelope has no result.suggestions")?,
            _ => map
                .remove("suggestions")
                .ok_or("expected a suggestion array or an object with `suggestions`")?,
        },
        _ => return Err("expected a suggestion array".into()),
    };
    Ok(serde_json::from_value(list)?)
}

/// Parse a flag value through the type's serde names
/// (`pending`, `move-to-pool`, `critical`, ...).
pub fn parse_flag<T: DeserializeOwned>(flag: &str, raw: &str) -> Result<T, Box<dyn std::error::Error>> {
    let parsed = serde_json::from_value(Value::String(raw.trim().to_lowercase()))
        .map_err(|_| format!("invalid value '{}' for --{}", raw, flag))?;
    Ok(parsed)
}
