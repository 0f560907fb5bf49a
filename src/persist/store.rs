//! Reading and rewriting the LHPC config document on disk.
//!
//! Files are overwritten in place: no temp file, no backup.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::persist::types::{ConfigDocument, PersistError, PersistResult};

const INDENT: &[u8] = b"    ";

/// Parse a config document from its JSON text.
pub fn document_from_json(s: &str) -> PersistResult<ConfigDocument> {
    serde_json::from_str(s).map_err(PersistError::InvalidDocument)
}

/// Render a config document as pretty JSON with 4-space indentation.
///
/// Non-ASCII text is written as raw UTF-8 rather than `\uXXXX` escapes, so the output is not
/// byte-identical to what the legacy Python script wrote.
pub fn document_to_json(document: &ConfigDocument) -> PersistResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer).map_err(PersistError::Encode)?;

    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn ensure_config_exists(path: &Path) -> PersistResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PersistError::Missing(path.to_path_buf()))
    }
}

pub fn load_config_file(path: &Path) -> PersistResult<ConfigDocument> {
    debug!(path = %path.display(), "Loading config file");
    let raw = fs::read_to_string(path)
        .map_err(|source| PersistError::Io { path: path.to_path_buf(), source })?;
    let document = document_from_json(&raw)?;
    debug!(?document, "Config file data");
    Ok(document)
}

pub fn save_config_file(document: &ConfigDocument, path: &Path) -> PersistResult<()> {
    debug!(?document, "New config data");
    let rendered = document_to_json(document)?;
    fs::write(path, rendered)
        .map_err(|source| PersistError::Io { path: path.to_path_buf(), source })
}
