// src/error.rs
//! Application error types.
//!
//! Missing or malformed blocks are never errors in this crate: the
//! extractors skip them. The variants below cover the failures that do
//! reach a caller, such as unreadable input, network trouble or bad ids.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion returned HTTP {status} for {endpoint}: {message}")]
    NotionService {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error interacting with clipboard: {0}")]
    Clipboard(String),

    #[error("No record map for page {page_id} in {dir}")]
    RecordMapNotFound { page_id: String, dir: PathBuf },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::NetworkFailure(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AppError::NotionService { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// Keeps the whole context chain in the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: format!("{:#}", err),
            source: None,
        }
    }
}

impl From<arboard::Error> for AppError {
    fn from(err: arboard::Error) -> Self {
        AppError::Clipboard(format!("Clipboard error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_classify_by_status() {
        let throttled = AppError::NotionService {
            endpoint: "loadPageChunk".into(),
            status: 429,
            message: "slow down".into(),
        };
        let missing = AppError::NotionService {
            endpoint: "loadPageChunk".into(),
            status: 404,
            message: "not found".into(),
        };
        assert!(throttled.is_transient());
        assert!(!missing.is_transient());
        assert!(!AppError::InvalidId("x".into()).is_transient());
    }

    #[test]
    fn anyhow_context_survives_conversion() {
        let err: AppError = anyhow::anyhow!("disk full")
            .context("writing RSS channel")
            .into();
        assert_eq!(err.to_string(), "Internal error: writing RSS channel: disk full");
    }

    #[test]
    fn delivery_failure_lists_every_cause() {
        let err = AppError::DeliveryFailed {
            failures: vec!["disk full".into(), "no clipboard".into()],
        };
        assert_eq!(
            err.to_string(),
            "Output delivery failed: disk full, no clipboard"
        );
    }
}
