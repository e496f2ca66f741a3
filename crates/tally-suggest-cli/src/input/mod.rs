pub mod file;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::{self, Read};

/// `--input <file>` if given, otherwise piped stdin.
pub fn load(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_json_value(path),
        None => piped_or_missing(what),
    }
}

/// Like [`load`], but a file may also be YAML and the document is decoded
/// straight into `T`.
pub fn load_as<T: DeserializeOwned>(path: Option<&str>, what: &str) -> Result<T, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_document(path),
        None => Ok(serde_json::from_value(piped_or_missing(what)?)?),
    }
}

fn piped_or_missing(what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Err(missing(what));
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)?.ok_or_else(|| missing(what))
}

fn missing(what: &str) -> Box<dyn std::error::Error> {
    format!("--input <file> or stdin required for {}", what).into()
}

/// Blank input counts as nothing piped.
fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin as JSON: {}", e))?;
    Ok(Some(value))
}
