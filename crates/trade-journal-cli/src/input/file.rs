use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Read a JSON file into a typed value.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let value = read_json_value(path)?;
    serde_json::from_value(value)
        .map_err(|e| format!("Unexpected content in '{}': {}", path, e).into())
}

/// Read a JSON file as an untyped value.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let file = existing_file(path)?;
    let contents = fs::read_to_string(&file)
        .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
    let value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", file.display(), e))?;
    Ok(value)
}

/// Absolute path of `path`, which must name an existing regular file.
fn existing_file(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = PathBuf::from(path);
    let full = if p.is_absolute() {
        p
    } else {
        std::env::current_dir()?.join(p)
    };
    if !full.exists() {
        return Err(format!("File not found: {}", full.display()).into());
    }
    if !full.is_file() {
        return Err(format!("Not a file: {}", full.display()).into());
    }
    Ok(full)
}
