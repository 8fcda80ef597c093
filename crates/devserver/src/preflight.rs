//! Startup checks run before the server binds its port

use crate::inspection::ScriptInspection;
use anyhow::{Context, Result};
use config::{script, ClientConfig, Config, ConfigValidator, SiteConfig, ValidationIssue};
use std::path::PathBuf;
use tracing::{info, warn};
use types::{ConfigError, NavermapError};

/// What happened to the config script during startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// A new script was written from the environment
    Written(PathBuf),
    /// A script already existed and was left alone
    AlreadyExists(PathBuf),
    /// Generation is turned off in the settings
    Disabled,
}

/// Result of the startup checks
#[derive(Debug, Clone)]
pub struct PreflightReport {
    pub generated: GenerateOutcome,
    pub inspection: ScriptInspection,
}

/// Run every startup check.
///
/// Only a missing index page stops the server; config script problems are
/// logged and left for the page to display.
pub fn run(config: &Config) -> Result<PreflightReport> {
    let generated = if config.site.generate_config {
        match generate_config_script(&config.site, false) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Failed to generate config script");
                GenerateOutcome::Disabled
            }
        }
    } else {
        GenerateOutcome::Disabled
    };

    check_index(&config.site)?;

    let inspection = check_config_script(&config.site)?;

    Ok(PreflightReport {
        generated,
        inspection,
    })
}

/// Validate the final settings, after command line overrides.
///
/// The first error stops startup; warnings are logged and returned.
pub fn check_settings(config: &Config) -> Result<Vec<ValidationIssue>> {
    let report = ConfigValidator::validate(config);
    if let Some(issue) = report.errors.into_iter().next() {
        let err = NavermapError::from(ConfigError::ValidationError {
            field: issue.field,
            message: issue.message,
        });
        return Err(err.into());
    }

    for warning in &report.warnings {
        warn!(field = %warning.field, "{}", warning.message);
    }
    Ok(report.warnings)
}

/// Write the config script from the process environment
pub fn generate_config_script(site: &SiteConfig, force: bool) -> Result<GenerateOutcome> {
    generate_config_script_with(site, force, |name| std::env::var(name).ok())
}

/// Write the config script from a variable lookup
pub fn generate_config_script_with<F>(site: &SiteConfig, force: bool, lookup: F) -> Result<GenerateOutcome>
where
    F: Fn(&str) -> Option<String>,
{
    let path = site.config_script_path();
    if path.exists() && !force {
        info!(path = %path.display(), "Config script already exists");
        return Ok(GenerateOutcome::AlreadyExists(path));
    }

    let client_config = ClientConfig::from_lookup(lookup)
        .context("Failed to build client configuration from environment")?;
    script::write(&path, &client_config)?;

    info!(path = %path.display(), "Config script generated");
    Ok(GenerateOutcome::Written(path))
}

/// Fail when the index page is missing
pub fn check_index(site: &SiteConfig) -> Result<()> {
    let path = site.index_path();
    if !path.is_file() {
        return Err(NavermapError::MissingFile {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Validate the config script and log what the page will report
pub fn check_config_script(site: &SiteConfig) -> Result<ScriptInspection> {
    let path = site.config_script_path();
    let inspection = ScriptInspection::read(&path)?;

    for warning in &inspection.warnings {
        warn!(path = %path.display(), "{}", warning);
    }

    if inspection.valid {
        info!(path = %path.display(), "Config script is complete");
    } else {
        for (violation, message) in inspection.violations.iter().zip(&inspection.errors) {
            warn!(field = violation.field(), "{}", message);
        }
        warn!("Config script is incomplete; starting anyway, the page will show the errors");
    }

    Ok(inspection)
}
