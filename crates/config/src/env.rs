//! Building the client configuration from environment variables

use crate::client::{ClientConfig, NaverMapSettings, SupabaseSettings};
use serde_json::{json, Value};
use types::ConfigError;

pub const NAVER_CLIENT_ID_VAR: &str = "NAVER_CLIENT_ID";
pub const NAVER_CLIENT_SECRET_VAR: &str = "NAVER_MAP_CLIENT_SECRET";
pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const NAVER_MAP_CENTER_VAR: &str = "NAVER_MAP_CENTER";

impl ClientConfig {
    /// Build the client configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the client configuration from a variable lookup.
    ///
    /// Credentials that are not set become empty strings, so the page still
    /// gets every key and the validator reports them as missing. `NAVER_MAP`
    /// is only written when `NAVER_MAP_CENTER` (`lat,lng`) is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| Value::String(lookup(name).unwrap_or_default());

        let naver_map = match lookup(NAVER_MAP_CENTER_VAR) {
            Some(raw) if !raw.trim().is_empty() => Some(NaverMapSettings {
                center: Some(parse_center(&raw)?),
                ..Default::default()
            }),
            _ => None,
        };

        Ok(Self {
            client_id: Some(var(NAVER_CLIENT_ID_VAR)),
            client_secret: Some(var(NAVER_CLIENT_SECRET_VAR)),
            supabase: Some(SupabaseSettings {
                url: Some(var(SUPABASE_URL_VAR)),
                anon_key: Some(var(SUPABASE_ANON_KEY_VAR)),
                ..Default::default()
            }),
            naver_map,
            ..Default::default()
        })
    }
}

/// Parse a `lat,lng` pair into the `CENTER` object the page expects
fn parse_center(raw: &str) -> Result<Value, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        field: NAVER_MAP_CENTER_VAR.to_string(),
        value: raw.to_string(),
    };

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid());
    }

    Ok(json!({ "lat": lat, "lng": lng }))
}
