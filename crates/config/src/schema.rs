//! Dev server settings schema

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Static site configuration
    #[serde(default)]
    pub site: SiteConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Add permissive CORS headers to every response
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

/// Static site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory served over HTTP
    #[serde(default = "default_site_root")]
    pub root: String,
    /// Entry page, relative to `root`
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Script that assigns `window.CONFIG`, relative to `root`
    #[serde(default = "default_config_script")]
    pub config_script: String,
    /// Write the config script from the environment when it does not exist
    #[serde(default = "default_true")]
    pub generate_config: bool,
    /// Open the index page in a browser once the server is up
    #[serde(default = "default_false")]
    pub open_browser: bool,
    /// Delay before opening the browser, in milliseconds
    #[serde(default = "default_open_browser_delay")]
    pub open_browser_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_site_root() -> String {
    ".".to_string()
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_config_script() -> String {
    "config.js".to_string()
}

fn default_open_browser_delay() -> u64 {
    2000 // 2 seconds
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("Invalid server host {}: {}", self.server.host, e))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// URL of the index page as a local browser would reach it
    pub fn index_url(&self) -> String {
        let host = match self.server.host.parse::<IpAddr>() {
            Ok(ip) if ip.is_unspecified() => "localhost".to_string(),
            Ok(IpAddr::V6(ip)) => format!("[{}]", ip),
            _ => self.server.host.clone(),
        };
        format!("http://{}:{}/{}", host, self.server.port, self.site.index_file)
    }
}

impl SiteConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root_path().join(&self.index_file)
    }

    pub fn config_script_path(&self) -> PathBuf {
        self.root_path().join(&self.config_script)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            cors_enabled: default_true(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_site_root(),
            index_file: default_index_file(),
            config_script: default_config_script(),
            generate_config: default_true(),
            open_browser: default_false(),
            open_browser_delay_ms: default_open_browser_delay(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
