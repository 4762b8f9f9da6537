//! Save/load passthrough for the raw record set.
//!
//! The saved file is the raw fetched data verbatim (including any merged
//! `_price` markers), so a later `--load` run re-enters the pipeline
//! exactly where the fetch left off. Key order survives the round trip.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ExportError, Result};

/// Write the raw record set to `path` as JSON.
pub fn save(path: &Path, raw: &Map<String, Value>) -> Result<()> {
    let text = serde_json::to_string(raw)?;
    fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), records = raw.len(), "saved raw record set");
    Ok(())
}

/// Read a previously saved record set from `path`.
pub fn load(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| ExportError::Format(format!("{}: invalid JSON: {e}", path.display())))?;
    match value {
        Value::Object(map) => {
            debug!(path = %path.display(), records = map.len(), "loaded raw record set");
            Ok(map)
        }
        _ => Err(ExportError::Format(format!(
            "{}: expected a JSON object of wishlist records",
            path.display()
        ))),
    }
}
