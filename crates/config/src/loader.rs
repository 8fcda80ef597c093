//! Configuration loader implementation

use crate::schema::Config;
use crate::validation::ConfigValidator;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::Path;
use types::ConfigError;

/// Prefix for environment overrides, e.g. `NAVERMAP_SERVER__PORT`
pub const ENV_PREFIX: &str = "NAVERMAP_";

/// Configuration loader that handles YAML files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file and environment variables.
    ///
    /// The file is optional; every setting has a default.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let config_path = config_path.as_ref();

        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if config_path.exists() {
            figment = figment.merge(Yaml::file(config_path));
        }

        let config: Config = Self::with_env(figment)
            .extract()
            .context("Failed to parse configuration")?;

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<Config> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml_content))
            .extract()
            .context("Failed to parse configuration from string")?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            // Override with environment variables (prefixed with NAVERMAP_)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            // The plain PORT / LOG_FORMAT variables the start scripts use
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(Env::raw().only(&["LOG_FORMAT"]).map(|_| "logging.format".into()))
    }

    /// Reject configurations with validation errors
    fn validate(config: &Config) -> Result<()> {
        let report = ConfigValidator::validate(config);
        if let Some(issue) = report.errors.first() {
            return Err(ConfigError::ValidationError {
                field: issue.field.clone(),
                message: issue.message.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Get default configuration
    pub fn default() -> Config {
        Config::default()
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let yaml_content = serde_yaml::to_string(&config)
            .context("Failed to serialize default configuration")?;

        std::fs::write(path.as_ref(), yaml_content)
            .context("Failed to write example configuration file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_default_config() {
        let config = ConfigLoader::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.site.config_script, "config.js");
    }

    #[test]
    fn test_load_from_string() {
        let yaml_content = r#"
server:
  host: "127.0.0.1"
  port: 9090
site:
  root: "public"
  open_browser: true
logging:
  level: "debug"
  format: "json"
"#;

        let config = ConfigLoader::load_from_str(yaml_content).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.site.root, "public");
        assert!(config.site.open_browser);
        assert_eq!(config.site.index_file, "index.html");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_validation_errors() {
        let result = ConfigLoader::load_from_str("server:\n  port: 0\n");
        assert!(result.is_err());

        let result = ConfigLoader::load_from_str("logging:\n  level: \"loud\"\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let config = ConfigLoader::load("does-not-exist.yaml").unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("navermap.yaml", "server:\n  port: 8100\nsite:\n  root: \"www\"\n")?;
            jail.set_env("NAVERMAP_SITE__INDEX_FILE", "map.html");
            jail.set_env("NAVERMAP_SERVER__REQUEST_TIMEOUT_SECONDS", "45");
            jail.set_env("PORT", "8200");
            jail.set_env("LOG_FORMAT", "json");

            let config = ConfigLoader::load("navermap.yaml").unwrap();
            assert_eq!(config.server.port, 8200);
            assert_eq!(config.server.request_timeout_seconds, 45);
            assert_eq!(config.site.root, "www");
            assert_eq!(config.site.index_file, "map.html");
            assert_eq!(config.logging.format, "json");
            Ok(())
        });
    }

    #[test]
    fn test_create_example() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = ConfigLoader::create_example(temp_file.path());
        assert!(result.is_ok());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("server:"));
        assert!(content.contains("config_script: config.js"));

        let reloaded = ConfigLoader::load_from_str(&content).unwrap();
        assert_eq!(reloaded, Config::default());
    }
}
