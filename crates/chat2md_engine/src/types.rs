use std::fmt;
use std::path::PathBuf;

/// Failure categories surfaced to the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing input file, settings file, prompt template or browser binary.
    NotFound,
    /// Malformed input, settings, archive or API response.
    Validation,
    Auth,
    RateLimit,
    /// Any other non-2xx answer from the chat-completion endpoint.
    Api { status: u16 },
    Timeout,
    Network,
    /// Local filesystem failure while reading or writing.
    Io,
}

impl ErrorKind {
    /// Short label printed in front of the message on stderr.
    pub fn category(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "File error",
            ErrorKind::Validation => "Validation error",
            ErrorKind::Auth => "Authentication error",
            ErrorKind::RateLimit => "Rate limit",
            ErrorKind::Api { .. } => "API error",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Network => "Network error",
            ErrorKind::Io => "IO error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Auth => write!(f, "authentication"),
            ErrorKind::RateLimit => write!(f, "rate limited"),
            ErrorKind::Api { status } => write!(f, "api status {status}"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Network => write!(f, "network error"),
            ErrorKind::Io => write!(f, "io error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConvertError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ConvertError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }
}

impl From<crate::persist::PersistError> for ConvertError {
    fn from(err: crate::persist::PersistError) -> Self {
        ConvertError::io(err.to_string())
    }
}

/// Raw conversation text plus the identifier recorded as its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub text: String,
    pub source: String,
}

/// Progress notifications emitted by the pipeline, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Extracting { source: String, from_url: bool },
    Extracted { chars: usize },
    Structurizing { chars: usize, endpoint: String },
    Structurized { bytes: usize },
    Writing { path: PathBuf },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: PipelineEvent) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub source: String,
    pub extracted_chars: usize,
    pub written_bytes: u64,
}
