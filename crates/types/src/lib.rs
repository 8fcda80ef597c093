//! Shared types for the Navermap dev server
//!
//! This crate contains the error types and the violation vocabulary used
//! across the configuration and server crates.

pub mod error;
pub mod violation;

// Re-export commonly used types
pub use error::{ConfigError, NavermapError, ScriptError};
pub use violation::Violation;
