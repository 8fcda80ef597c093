//! The browser-side `window.CONFIG` object
//!
//! Every leaf is kept as a raw [`Value`] so a wrongly typed setting is still
//! accepted and judged only by JavaScript truthiness. Groups that are present
//! but are not objects deserialize to `None`, which is what the page sees when
//! it reads `CONFIG.SUPABASE.URL` off a string or a number.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const CLIENT_ID_KEY: &str = "CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "CLIENT_SECRET";
pub const SUPABASE_KEY: &str = "SUPABASE";
pub const NAVER_MAP_KEY: &str = "NAVER_MAP";

/// Client configuration exposed to the map page as `window.CONFIG`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Naver Maps client id
    #[serde(rename = "CLIENT_ID", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Value>,
    /// Naver Maps client secret
    #[serde(rename = "CLIENT_SECRET", default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<Value>,
    /// Supabase backend settings
    #[serde(
        rename = "SUPABASE",
        default,
        deserialize_with = "lenient_group",
        skip_serializing_if = "Option::is_none"
    )]
    pub supabase: Option<SupabaseSettings>,
    /// Map display settings
    #[serde(
        rename = "NAVER_MAP",
        default,
        deserialize_with = "lenient_group",
        skip_serializing_if = "Option::is_none"
    )]
    pub naver_map: Option<NaverMapSettings>,
    /// Keys the validator does not look at
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `CONFIG.SUPABASE`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupabaseSettings {
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(rename = "ANON_KEY", default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `CONFIG.NAVER_MAP`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaverMapSettings {
    /// Initial map center; its shape is up to the page
    #[serde(rename = "CENTER", default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JavaScript truthiness for a JSON value.
///
/// `null`, `false`, any numeric zero and the empty string are falsy.
/// Everything else, including `"0"`, `[]` and `{}`, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Truthiness of an optional slot, where a missing key is `undefined`
pub fn is_set(value: Option<&Value>) -> bool {
    value.is_some_and(is_truthy)
}

fn lenient_group<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

impl ClientConfig {
    /// Interpret a raw value the way the page interprets `window.CONFIG`.
    ///
    /// A falsy value means the object is not defined at all. A truthy value
    /// that is not an object is a config with none of the expected fields.
    pub fn from_value(value: Value) -> Option<Self> {
        if !is_truthy(&value) {
            return None;
        }

        let Value::Object(mut map) = value else {
            return Some(Self::default());
        };

        Some(Self {
            client_id: take_leaf(&mut map, CLIENT_ID_KEY),
            client_secret: take_leaf(&mut map, CLIENT_SECRET_KEY),
            supabase: take_group(&mut map, SUPABASE_KEY).map(SupabaseSettings::from_map),
            naver_map: take_group(&mut map, NAVER_MAP_KEY).map(NaverMapSettings::from_map),
            extra: map,
        })
    }

    /// Serialize back into a JSON object
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Validate this configuration, see [`crate::validation::validate`]
    pub fn validate(&self) -> Vec<String> {
        crate::validation::validate(Some(self))
    }

    /// Whether the Naver Maps client id is set
    pub fn has_client_id(&self) -> bool {
        is_set(self.client_id.as_ref())
    }

    /// Whether the Naver Maps client secret is set
    pub fn has_client_secret(&self) -> bool {
        is_set(self.client_secret.as_ref())
    }

    /// Whether both Supabase fields are set
    pub fn has_complete_supabase(&self) -> bool {
        self.supabase.as_ref().is_some_and(|s| {
            is_set(s.url.as_ref()) && is_set(s.anon_key.as_ref())
        })
    }

    /// Whether the map center is set
    pub fn has_complete_naver_map(&self) -> bool {
        self.naver_map
            .as_ref()
            .is_some_and(|m| is_set(m.center.as_ref()))
    }
}

impl SupabaseSettings {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            url: take_leaf(&mut map, "URL"),
            anon_key: take_leaf(&mut map, "ANON_KEY"),
            extra: map,
        }
    }
}

impl NaverMapSettings {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            center: take_leaf(&mut map, "CENTER"),
            extra: map,
        }
    }
}

// null and missing are both undefined to the page
fn take_leaf(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    map.remove(key).filter(|v| !v.is_null())
}

fn take_group(map: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match map.remove(key) {
        Some(Value::Object(inner)) => Some(inner),
        _ => None,
    }
}
