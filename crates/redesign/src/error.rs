//! Error types for theme loading, compilation, and application.
//!
//! This module provides [`ThemeError`], the single error type returned by the
//! store, compiler, injector, and pipeline. Two of its variants are
//! diagnostics rather than failures: [`ThemeError::MalformedThemeEntry`] and
//! [`ThemeError::InvalidColorValue`] are collected while compiling so that one
//! bad color never blanks a whole theme.

use std::path::PathBuf;

/// Error type for theme operations.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// Unknown theme name, and the default theme could not be resolved either.
    #[error("theme not found: {name}")]
    NotFound { name: String },

    /// A color key whose tuple is structurally invalid (wrong arity, non-string element).
    #[error("malformed color entry '{key}': {reason}")]
    MalformedThemeEntry { key: String, reason: String },

    /// A color string that does not parse as a hex color.
    #[error("invalid color value '{value}' for '{key}'")]
    InvalidColorValue { key: String, value: String },

    /// The theme has no color with this key.
    #[error("unknown color key: {key}")]
    UnknownColorKey { key: String },

    /// A theme file is not valid theme JSON.
    #[error("failed to parse theme {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// I/O error reading or writing theme, config, or stylesheet files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The temporary file could not be moved over its destination.
    #[error("failed to persist {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure while writing JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Style template failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The debug file logger could not be started.
    #[error("logger error: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}

impl ThemeError {
    /// Create a malformed-entry diagnostic.
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedThemeEntry {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Result type for theme operations.
pub type Result<T> = std::result::Result<T, ThemeError>;
