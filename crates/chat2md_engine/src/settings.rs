use std::fs;
use std::path::{Path, PathBuf};

use chat2md_core::Config;
use engine_logging::engine_info;

use crate::persist::write_atomic;
use crate::ConvertError;

pub const CONFIG_DIR_NAME: &str = "aichat2md";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// `~/.config/aichat2md/config.json` on every platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    })
}

/// Load persisted settings, backfilling missing keys from [`Config::default`].
pub fn load_config(path: &Path) -> Result<Config, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::not_found(format!(
            "Configuration file not found at {}. Please run: aichat2md --setup",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .map_err(|err| ConvertError::io(format!("Failed to read {}: {err}", path.display())))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config, ConvertError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|err| ConvertError::validation(format!("Invalid JSON in config file: {err}")))?;
    if !value.is_object() {
        return Err(ConvertError::validation(
            "Invalid config file: expected a JSON object",
        ));
    }

    let config: Config = serde_json::from_value(value)
        .map_err(|err| ConvertError::validation(format!("Invalid config file: {err}")))?;
    let missing = config.missing_fields();
    if missing.contains(&"api_key") {
        return Err(ConvertError::validation(
            "API key not configured. Please run: aichat2md --setup",
        ));
    }
    if !missing.is_empty() {
        return Err(ConvertError::validation(format!(
            "Invalid config file: empty {}. Please run: aichat2md --setup",
            missing.join(", ")
        )));
    }
    Ok(config)
}

/// Write settings as pretty JSON, replacing any previous file.
pub fn save_config(path: &Path, config: &Config) -> Result<PathBuf, ConvertError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|err| ConvertError::validation(format!("Failed to serialize config: {err}")))?;
    let written = write_atomic(path, &content)?;
    engine_info!("Saved configuration to {:?}", written);
    Ok(written)
}
