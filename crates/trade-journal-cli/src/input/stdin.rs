use serde_json::Value;
use std::io::{self, Read};

/// JSON piped on stdin, or `None` when stdin is a terminal or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    read_piped(io::stdin().lock())
}

fn read_piped(mut reader: impl Read) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(trimmed).map_err(|e| format!("Invalid JSON on stdin: {}", e))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_none() {
        assert!(read_piped("  \n".as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_parses_json() {
        let v = read_piped(r#"{"symbol": "EURUSD"}"#.as_bytes()).unwrap().unwrap();
        assert_eq!(v["symbol"], "EURUSD");
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(read_piped("long 1.08".as_bytes()).is_err());
    }
}
