use std::path::Path;

use engine_logging::engine_debug;
use plist::Value;

use crate::decode::decode_html;
use crate::extract::{Extractor, VisibleTextExtractor};
use crate::ConvertError;

pub const ARCHIVE_EXTENSION: &str = "webarchive";

const MAIN_RESOURCE_KEY: &str = "WebMainResource";
const RESOURCE_DATA_KEY: &str = "WebResourceData";

/// Read a saved `.webarchive` and return the visible text of its main page.
pub fn extract_from_webarchive(path: &Path) -> Result<String, ConvertError> {
    let html_bytes = read_main_resource(path)?;
    let decoded = decode_html(&html_bytes);
    engine_debug!(
        "archive {:?}: {} bytes of html decoded as {}",
        path,
        html_bytes.len(),
        decoded.encoding_label
    );
    Ok(VisibleTextExtractor.extract_text(&decoded.html))
}

/// Pull the raw `WebMainResource.WebResourceData` bytes out of the container.
pub fn read_main_resource(path: &Path) -> Result<Vec<u8>, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::not_found(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let is_archive = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
    if !is_archive {
        return Err(ConvertError::validation(format!(
            "Not a webarchive file: {}",
            path.display()
        )));
    }

    let root = Value::from_file(path).map_err(|err| {
        if err.is_io() {
            ConvertError::io(format!("Failed to read {}: {err}", path.display()))
        } else {
            ConvertError::validation(format!("Invalid webarchive format: {err}"))
        }
    })?;

    let main_resource = root
        .as_dictionary()
        .and_then(|dict| dict.get(MAIN_RESOURCE_KEY))
        .and_then(Value::as_dictionary)
        .ok_or_else(|| ConvertError::validation("Invalid webarchive: missing WebMainResource"))?;

    main_resource
        .get(RESOURCE_DATA_KEY)
        .and_then(Value::as_data)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| ConvertError::validation("Invalid webarchive: missing WebResourceData"))
}
