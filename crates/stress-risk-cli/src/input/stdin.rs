use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a piped JSON document from stdin and deserialise it into the
/// command's input type. Returns None when stdin is a TTY (interactive) or
/// nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_buffer(&buffer)
}

/// Deserialise a piped buffer; blank input counts as nothing piped.
fn parse_buffer<T: DeserializeOwned>(
    buffer: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed: T = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin JSON: {e}"))?;
    Ok(Some(parsed))
}
