//! Error types for the Navermap dev server

use thiserror::Error;

/// Main error type for the dev server
#[derive(Error, Debug)]
pub enum NavermapError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A file the site needs is missing
    #[error("Required file not found: {path}")]
    MissingFile { path: String },
}

/// Configuration specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Invalid value
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Errors raised while reading a `window.CONFIG = {...}` script
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Input ended inside a literal
    #[error("Unexpected end of script while reading {expected}")]
    UnexpectedEnd { expected: String },

    /// A character that cannot start or continue the current literal
    #[error("Unexpected character '{found}' at offset {offset}, expected {expected}")]
    UnexpectedChar {
        found: char,
        offset: usize,
        expected: String,
    },

    /// A number literal that does not parse
    #[error("Invalid number literal '{literal}' at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },

    /// A bad escape sequence inside a string literal
    #[error("Invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    /// Objects and arrays nested deeper than the reader allows
    #[error("Literal nested more than {limit} levels deep at offset {offset}")]
    NestingTooDeep { limit: usize, offset: usize },
}

impl ScriptError {
    /// Byte offset into the script where reading stopped, if known
    pub fn offset(&self) -> Option<usize> {
        match self {
            ScriptError::UnexpectedEnd { .. } => None,
            ScriptError::UnexpectedChar { offset, .. }
            | ScriptError::InvalidNumber { offset, .. }
            | ScriptError::InvalidEscape { offset }
            | ScriptError::NestingTooDeep { offset, .. } => Some(*offset),
        }
    }
}

impl From<ConfigError> for NavermapError {
    fn from(err: ConfigError) -> Self {
        NavermapError::Config(err.to_string())
    }
}
