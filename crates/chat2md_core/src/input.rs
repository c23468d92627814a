use std::path::{Path, PathBuf};

use url::Url;

/// What the user pointed the tool at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A share URL with an `http` or `https` scheme.
    Url(String),
    /// Anything else is treated as a path to a saved archive.
    Archive(PathBuf),
}

impl InputSource {
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_http_url(trimmed) {
            InputSource::Url(trimmed.to_string())
        } else {
            InputSource::Archive(PathBuf::from(raw))
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, InputSource::Url(_))
    }

    /// Identifier recorded in the front matter: the URL itself, or the
    /// archive's base filename.
    pub fn source_label(&self) -> String {
        match self {
            InputSource::Url(url) => url.clone(),
            InputSource::Archive(path) => file_name_of(path),
        }
    }
}

pub(crate) fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
