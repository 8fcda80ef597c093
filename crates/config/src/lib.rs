//! Configuration management for the Navermap dev server
//!
//! This crate holds two kinds of configuration: the browser-side
//! `window.CONFIG` object the map page reads (model, validator and the
//! `config.js` codec), and the dev server's own settings loaded from YAML
//! files and environment variables.

pub mod client;
pub mod env;
pub mod loader;
pub mod schema;
pub mod script;
pub mod validation;

pub use client::{is_truthy, ClientConfig, NaverMapSettings, SupabaseSettings};
pub use loader::ConfigLoader;
pub use schema::*;
pub use validation::*;
