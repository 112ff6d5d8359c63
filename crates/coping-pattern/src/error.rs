//! Error types for pattern generation and rendering.
//!
//! ## Rust Lesson #20: Error Handling
//!
//! Rust uses `Result<T, E>` instead of exceptions. `thiserror` derives the
//! `Display` and `std::error::Error` boilerplate from the `#[error(...)]`
//! attributes, so each variant carries its own message.
//!
//! Every error here is terminal for the current request: nothing is retried
//! and no partial output is produced.

use thiserror::Error;

/// Errors that can occur while generating or rendering a coping pattern.
#[derive(Error, Debug)]
pub enum CopingError {
    /// Missing, unparseable or out-of-range input. Raised before generation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending parameter
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Requested output kind is not one of text, png or pdf.
    #[error("unsupported output format '{0}' (expected text, png or pdf)")]
    UnsupportedFormat(String),

    /// The SVG, PNG or PDF backend failed to produce bytes.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// A config file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CopingError {
    /// Shorthand for a [`CopingError::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CopingError::Validation {
            field,
            message: message.into(),
        }
    }

    /// True for input errors (the caller sent something wrong).
    pub fn is_validation(&self) -> bool {
        matches!(self, CopingError::Validation { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CopingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field() {
        let err = CopingError::validation("phi", "must be greater than 0");
        assert_eq!(err.to_string(), "invalid phi: must be greater than 0");
        assert!(err.is_validation());
    }

    #[test]
    fn unsupported_format_message() {
        let err = CopingError::UnsupportedFormat("svg".to_string());
        assert!(err.to_string().contains("'svg'"));
        assert!(!err.is_validation());
    }

    #[test]
    fn io_errors_convert() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.yaml")?)
        }
        assert!(matches!(read(), Err(CopingError::Io(_))));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CopingError>();
    }
}
