//! Configuration validation utilities

use crate::client::ClientConfig;
use crate::schema::Config;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use types::Violation;

/// Placeholder id shipped in the sample `config.js`
pub const CLIENT_ID_PLACEHOLDER: &str = "YOUR_NAVER_MAP_CLIENT_ID";

/// Check the client configuration and return every violation in check order.
///
/// An absent configuration yields only [`Violation::ConfigUndefined`]; the
/// remaining checks are independent of each other.
pub fn find_violations(config: Option<&ClientConfig>) -> Vec<Violation> {
    let Some(config) = config else {
        return vec![Violation::ConfigUndefined];
    };

    let mut violations = Vec::new();
    if !config.has_client_id() {
        violations.push(Violation::MissingClientId);
    }
    if !config.has_client_secret() {
        violations.push(Violation::MissingClientSecret);
    }
    if !config.has_complete_supabase() {
        violations.push(Violation::IncompleteSupabase);
    }
    if !config.has_complete_naver_map() {
        violations.push(Violation::IncompleteNaverMap);
    }
    violations
}

/// Check the client configuration and return the violation messages.
///
/// An empty list means the configuration exists and every group is present.
pub fn validate(config: Option<&ClientConfig>) -> Vec<String> {
    find_violations(config)
        .into_iter()
        .map(|v| v.message().to_string())
        .collect()
}

/// Warn when the client id still looks like a placeholder.
///
/// Naver issues purely alphanumeric client ids, so anything else (including
/// the sample placeholder) is reported. Returns `None` when the id looks real
/// or when there is no configuration to inspect.
pub fn client_id_advisory(config: Option<&ClientConfig>) -> Option<String> {
    let config = config?;
    match config.client_id.as_ref() {
        Some(Value::String(id)) if id == CLIENT_ID_PLACEHOLDER => Some(format!(
            "CLIENT_ID is still the placeholder '{}'; replace it with the id issued by Naver Cloud Platform",
            CLIENT_ID_PLACEHOLDER
        )),
        Some(Value::String(id)) if client_id_pattern().is_match(id) => None,
        Some(Value::String(id)) if id.is_empty() => {
            Some("CLIENT_ID is empty; set NAVER_CLIENT_ID or edit the config script".to_string())
        }
        Some(Value::String(_)) => {
            Some("CLIENT_ID contains characters other than letters and digits".to_string())
        }
        Some(_) => Some("CLIENT_ID is not a string".to_string()),
        None => Some("CLIENT_ID is not set; set NAVER_CLIENT_ID or edit the config script".to_string()),
    }
}

fn client_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").expect("static pattern"))
}

/// Dev server settings validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate complete configuration
    pub fn validate(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::default();

        Self::validate_server(config, &mut report);
        Self::validate_site(config, &mut report);
        Self::validate_logging(config, &mut report);

        report
    }

    fn validate_server(config: &Config, report: &mut ValidationReport) {
        if config.server.port == 0 {
            report.add_error("server.port", "Server port cannot be 0");
        } else if config.server.port < 1024 {
            report.add_warning("server.port", "Server port is below 1024, may require elevated privileges");
        }

        if config.server.host.is_empty() {
            report.add_error("server.host", "Server host cannot be empty");
        } else if config.socket_addr().is_err() {
            report.add_error(
                "server.host",
                &format!("Server host '{}' is not an IP address", config.server.host),
            );
        }

        if config.server.request_timeout_seconds == 0 {
            report.add_error("server.request_timeout_seconds", "Request timeout cannot be 0");
        } else if config.server.request_timeout_seconds > 300 {
            report.add_warning("server.request_timeout_seconds", "Request timeout is very high");
        }

        if !config.server.cors_enabled {
            report.add_warning("server.cors_enabled", "CORS headers are disabled, cross-origin map requests may fail");
        }
    }

    fn validate_site(config: &Config, report: &mut ValidationReport) {
        if config.site.root.is_empty() {
            report.add_error("site.root", "Site root cannot be empty");
        }

        if config.site.index_file.is_empty() {
            report.add_error("site.index_file", "Index file name cannot be empty");
        }

        if config.site.config_script.is_empty() {
            report.add_error("site.config_script", "Config script name cannot be empty");
        } else if !config.site.config_script.ends_with(".js") {
            report.add_warning("site.config_script", "Config script does not end in .js, browsers may refuse to run it");
        }

        if config.site.open_browser_delay_ms > 60_000 {
            report.add_warning("site.open_browser_delay_ms", "Browser open delay is longer than a minute");
        }
    }

    fn validate_logging(config: &Config, report: &mut ValidationReport) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.as_str()) {
            report.add_error(
                "logging.level",
                &format!("Invalid log level: {}. Valid levels: {:?}", config.logging.level, valid_levels),
            );
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&config.logging.format.as_str()) {
            report.add_error(
                "logging.format",
                &format!("Invalid log format: {}. Valid formats: {:?}", config.logging.format, valid_formats),
            );
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_config() -> ClientConfig {
        ClientConfig::from_value(json!({
            "CLIENT_ID": "abc123",
            "CLIENT_SECRET": "s3cret",
            "SUPABASE": { "URL": "https://demo.supabase.co", "ANON_KEY": "anon" },
            "NAVER_MAP": { "CENTER": { "lat": 37.5665, "lng": 126.978 } }
        }))
        .unwrap()
    }

    #[test]
    fn test_absent_config_short_circuits() {
        assert_eq!(validate(None), vec!["CONFIG 객체가 정의되지 않았습니다.".to_string()]);
        assert_eq!(find_violations(None), vec![Violation::ConfigUndefined]);
    }

    #[test]
    fn test_full_config_is_valid() {
        let config = full_config();
        assert!(validate(Some(&config)).is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_missing_client_id_only() {
        let mut config = full_config();
        config.client_id = None;
        assert_eq!(
            validate(Some(&config)),
            vec!["네이버 지도 CLIENT_ID가 설정되지 않았습니다.".to_string()]
        );
    }

    #[test]
    fn test_missing_anon_key_only() {
        let mut config = full_config();
        config.supabase.as_mut().unwrap().anon_key = None;
        assert_eq!(
            find_violations(Some(&config)),
            vec![Violation::IncompleteSupabase]
        );
        assert_eq!(
            validate(Some(&config)),
            vec!["슈퍼베이스 설정이 완전하지 않습니다.".to_string()]
        );
    }

    #[test]
    fn test_three_violations_in_check_order() {
        let mut config = full_config();
        config.client_id = None;
        config.client_secret = None;
        config.naver_map = None;
        assert_eq!(
            validate(Some(&config)),
            vec![
                "네이버 지도 CLIENT_ID가 설정되지 않았습니다.".to_string(),
                "네이버 지도 CLIENT_SECRET(시크릿값)이 설정되지 않았습니다.".to_string(),
                "네이버 지도 설정이 완전하지 않습니다.".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_object_reports_every_group() {
        let config = ClientConfig::default();
        assert_eq!(
            find_violations(Some(&config)),
            vec![
                Violation::MissingClientId,
                Violation::MissingClientSecret,
                Violation::IncompleteSupabase,
                Violation::IncompleteNaverMap,
            ]
        );
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        let config = ClientConfig::from_value(json!({
            "CLIENT_ID": "",
            "CLIENT_SECRET": 0,
            "SUPABASE": { "URL": false, "ANON_KEY": "anon" },
            "NAVER_MAP": { "CENTER": "" }
        }))
        .unwrap();
        assert_eq!(validate(Some(&config)).len(), 4);
    }

    #[test]
    fn test_center_object_with_zero_coordinates_is_present() {
        let mut config = full_config();
        config.naver_map.as_mut().unwrap().center = Some(json!({ "lat": 0, "lng": 0 }));
        assert!(validate(Some(&config)).is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut config = full_config();
        config.client_secret = Some(json!(""));
        let first = validate(Some(&config));
        let second = validate(Some(&config));
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_client_id_advisory() {
        let mut config = full_config();
        assert_eq!(client_id_advisory(Some(&config)), None);

        config.client_id = Some(json!(CLIENT_ID_PLACEHOLDER));
        assert!(client_id_advisory(Some(&config)).unwrap().contains("placeholder"));

        config.client_id = Some(json!("abc-123"));
        assert!(client_id_advisory(Some(&config)).is_some());

        config.client_id = None;
        assert!(client_id_advisory(Some(&config)).unwrap().contains("not set"));

        assert_eq!(client_id_advisory(None), None);
    }

    #[test]
    fn test_advisory_does_not_affect_validation() {
        let mut config = full_config();
        config.client_id = Some(json!(CLIENT_ID_PLACEHOLDER));
        assert!(validate(Some(&config)).is_empty());
    }

    #[test]
    fn test_default_settings_are_valid() {
        let report = ConfigValidator::validate(&Config::default());
        assert!(report.errors.is_empty(), "{:?}", report.errors);
    }

    #[test]
    fn test_settings_errors_and_warnings() {
        let mut config = Config::default();
        config.server.port = 0;
        config.server.host = "not an ip".to_string();
        config.logging.format = "xml".to_string();
        config.site.config_script = "config.txt".to_string();

        let report = ConfigValidator::validate(&config);
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"server.port"));
        assert!(fields.contains(&"server.host"));
        assert!(fields.contains(&"logging.format"));
        assert_eq!(report.warnings[0].field, "site.config_script");
    }

    #[test]
    fn test_ipv6_host_is_accepted() {
        let mut config = Config::default();
        config.server.host = "::".to_string();
        let report = ConfigValidator::validate(&config);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
    }
}
