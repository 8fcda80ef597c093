//! Validation of the config script as the page would load it

use anyhow::{Context, Result};
use config::{client_id_advisory, find_violations, script, ClientConfig};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use types::Violation;

/// Outcome of validating a config script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptInspection {
    /// No violations were found
    pub valid: bool,
    /// Violation messages in check order
    pub errors: Vec<String>,
    /// Violation kinds in check order
    pub violations: Vec<Violation>,
    /// Problems that do not make the configuration invalid by themselves
    pub warnings: Vec<String>,
}

impl ScriptInspection {
    /// Inspect the text of a config script. `None` means there is no script.
    ///
    /// A script that cannot be read leaves `window.CONFIG` undefined in the
    /// browser, so it is judged as an absent configuration.
    pub fn from_source(source: Option<&str>) -> Self {
        let mut warnings = Vec::new();
        let config = match source {
            Some(source) => match script::parse_client_config(source) {
                Ok(config) => config,
                Err(e) => {
                    warnings.push(format!("Config script could not be read: {}", e));
                    None
                }
            },
            None => None,
        };

        Self::from_config(config.as_ref(), warnings)
    }

    fn from_config(config: Option<&ClientConfig>, mut warnings: Vec<String>) -> Self {
        let violations = find_violations(config);
        warnings.extend(client_id_advisory(config));

        Self {
            valid: violations.is_empty(),
            errors: violations.iter().map(|v| v.message().to_string()).collect(),
            violations,
            warnings,
        }
    }

    /// Read and inspect a config script on disk
    pub fn read(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(source) => Ok(Self::from_source(Some(&source))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::missing(path)),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Async variant of [`ScriptInspection::read`] for request handlers
    pub async fn read_async(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(source) => Ok(Self::from_source(Some(&source))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::missing(path)),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn missing(path: &Path) -> Self {
        let mut inspection = Self::from_source(None);
        inspection
            .warnings
            .insert(0, format!("Config script {} does not exist", path.display()));
        inspection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const COMPLETE: &str = r#"window.CONFIG = {
    CLIENT_ID: 'abc123',
    CLIENT_SECRET: 'secret',
    SUPABASE: { URL: 'https://demo.supabase.co', ANON_KEY: 'anon' },
    NAVER_MAP: { CENTER: { lat: 37.5665, lng: 126.978 } }
};"#;

    #[test]
    fn test_complete_script() {
        let inspection = ScriptInspection::from_source(Some(COMPLETE));
        assert!(inspection.valid);
        assert!(inspection.errors.is_empty());
        assert!(inspection.warnings.is_empty());
    }

    #[test]
    fn test_missing_script() {
        let dir = tempdir().unwrap();
        let inspection = ScriptInspection::read(&dir.path().join("config.js")).unwrap();
        assert!(!inspection.valid);
        assert_eq!(inspection.violations, vec![Violation::ConfigUndefined]);
        assert!(inspection.warnings[0].contains("does not exist"));
    }

    #[test]
    fn test_broken_script_is_undefined_config() {
        let inspection = ScriptInspection::from_source(Some("window.CONFIG = { CLIENT_ID: };"));
        assert_eq!(inspection.violations, vec![Violation::ConfigUndefined]);
        assert!(inspection.warnings[0].starts_with("Config script could not be read"));
    }

    #[test]
    fn test_placeholder_is_a_warning() {
        let source = COMPLETE.replace("abc123", "YOUR_NAVER_MAP_CLIENT_ID");
        let inspection = ScriptInspection::from_source(Some(&source));
        assert!(inspection.valid);
        assert_eq!(inspection.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_read_async_matches_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.js");
        std::fs::write(&path, "window.CONFIG = { CLIENT_ID: 'abc123' };").unwrap();

        let sync = ScriptInspection::read(&path).unwrap();
        let from_async = ScriptInspection::read_async(&path).await.unwrap();
        assert_eq!(sync, from_async);
        assert_eq!(
            sync.violations,
            vec![
                Violation::MissingClientSecret,
                Violation::IncompleteSupabase,
                Violation::IncompleteNaverMap,
            ]
        );
    }
}
