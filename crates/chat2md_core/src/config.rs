use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language of the instruction prompt and of the synthesized front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Zh];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language '{}' (expected en or zh)", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Persisted user settings.
///
/// Missing keys in the settings file are backfilled from [`Config::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub language: Language,
    pub output_dir: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://api.deepseek.com".to_string(),
            language: Language::En,
            output_dir: "~/Downloads".to_string(),
            model: "deepseek-chat".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
        }
    }
}

impl Config {
    /// Returns a copy with the per-run overrides applied. The input is left untouched.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Self {
        let mut config = self.clone();
        if let Some(language) = overrides.language {
            config.language = language;
        }
        if let Some(model) = overrides.model.as_deref().map(str::trim) {
            if !model.is_empty() {
                config.model = model.to_string();
            }
        }
        config
    }

    /// Names of required fields that are empty, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("api_key", &self.api_key),
            ("api_base_url", &self.api_base_url),
            ("model", &self.model),
            ("output_dir", &self.output_dir),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// In-memory overrides for a single run. Never written back to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub language: Option<Language>,
    pub model: Option<String>,
}
