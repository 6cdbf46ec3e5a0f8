//! Configuration management for the `EduAGI` dashboard client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Development server and reverse-proxy configuration
    #[serde(default)]
    pub dev_server: DevServerConfig,

    /// View behaviour configuration
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin every API path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built frontend assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Reverse-proxy rules, first match wins
    #[serde(default = "default_proxy_rules")]
    pub proxy: Vec<ProxyRule>,
}

/// Maps a local path prefix to a remote origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRule {
    /// Local path prefix, e.g. `/api`
    pub prefix: String,

    /// Remote origin requests are forwarded to
    pub target: String,
}

/// View behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Wait before re-fetching the analysis history after a submission
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3001
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_proxy_rules() -> Vec<ProxyRule> {
    vec![ProxyRule {
        prefix: "/api".to_string(),
        target: "https://eduagi-fullstack.zeabur.app".to_string(),
    }]
}

const fn default_refresh_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            proxy: default_proxy_rules(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay_ms(),
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

impl ApiConfig {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UiConfig {
    /// Refresh delay as a [`Duration`]
    #[must_use]
    pub const fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

impl ProxyRule {
    /// Whether `path` falls under this rule's prefix on a segment boundary
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return true;
        }
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Build the upstream URL for a local path and optional query string
    #[must_use]
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> String {
        let mut url = format!("{}{}", self.target.trim_end_matches('/'), path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

impl DevServerConfig {
    /// First proxy rule matching `path`
    #[must_use]
    pub fn find_rule(&self, path: &str) -> Option<&ProxyRule> {
        self.proxy.iter().find(|rule| rule.matches(path))
    }
}

impl Config {
    /// Load configuration from `eduagi.toml` (optional) and `EDUAGI__*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::build(config::File::with_name("eduagi").required(false))
    }

    /// Load configuration from an explicit file, still honouring environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> crate::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("EDUAGI").separator("__"))
            .build()
            .map_err(|e| crate::Error::configuration(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| crate::Error::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise fail at request time
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending value.
    pub fn validate(&self) -> crate::Result<()> {
        if !is_http_origin(&self.api.base_url) {
            return Err(crate::Error::configuration(format!(
                "api.base_url must be an http(s) origin, got '{}'",
                self.api.base_url
            )));
        }

        for rule in &self.dev_server.proxy {
            if !rule.prefix.starts_with('/') {
                return Err(crate::Error::configuration(format!(
                    "proxy prefix must start with '/', got '{}'",
                    rule.prefix
                )));
            }
            if !is_http_origin(&rule.target) {
                return Err(crate::Error::configuration(format!(
                    "proxy target must be an http(s) origin, got '{}'",
                    rule.target
                )));
            }
        }

        Ok(())
    }
}

fn is_http_origin(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.dev_server.port, 3001);
        assert_eq!(config.dev_server.static_dir, PathBuf::from("dist"));
        assert_eq!(config.dev_server.proxy.len(), 1);
        assert_eq!(config.dev_server.proxy[0].prefix, "/api");
        assert_eq!(config.ui.refresh_delay(), Duration::from_millis(2000));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_proxy_rule_matching() {
        let rule = ProxyRule {
            prefix: "/api".to_string(),
            target: "https://backend.example".to_string(),
        };

        assert!(rule.matches("/api"));
        assert!(rule.matches("/api/videos/history"));
        assert!(!rule.matches("/apidocs"));
        assert!(!rule.matches("/admin/dashboard"));
    }

    #[test]
    fn test_upstream_url_keeps_path_and_query() {
        let rule = ProxyRule {
            prefix: "/api".to_string(),
            target: "https://backend.example/".to_string(),
        };

        assert_eq!(
            rule.upstream_url("/api/resources/my", Some("page=2")),
            "https://backend.example/api/resources/my?page=2"
        );
        assert_eq!(
            rule.upstream_url("/api/auth/me", Some("")),
            "https://backend.example/api/auth/me"
        );
    }

    #[test]
    fn test_find_rule_first_match_wins() {
        let mut dev = DevServerConfig::default();
        dev.proxy.insert(
            0,
            ProxyRule {
                prefix: "/api/videos".to_string(),
                target: "http://video.local".to_string(),
            },
        );

        let rule = dev.find_rule("/api/videos/analyze").unwrap();
        assert_eq!(rule.target, "http://video.local");
        let rule = dev.find_rule("/api/resources/my").unwrap();
        assert_eq!(rule.target, "https://eduagi-fullstack.zeabur.app");
        assert!(dev.find_rule("/teacher/dashboard").is_none());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json = r#"{"api": {"base_url": "https://edu.example"}, "ui": {}}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.api.base_url, "https://edu.example");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.ui.refresh_delay_ms, 2000);
        assert_eq!(config.dev_server.host, "127.0.0.1");
    }

    #[test]
    fn test_validate_rejects_bad_origin() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8000".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_validate_rejects_relative_prefix() {
        let mut config = Config::default();
        config.dev_server.proxy[0].prefix = "api".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(
            file,
            r#"
[api]
base_url = "http://127.0.0.1:8000"
timeout_secs = 3

[ui]
refresh_delay_ms = 50

[[dev_server.proxy]]
prefix = "/api"
target = "http://127.0.0.1:8000"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.ui.refresh_delay_ms, 50);
        assert_eq!(config.dev_server.proxy[0].target, "http://127.0.0.1:8000");
        assert_eq!(config.dev_server.port, 3001);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = Config::load_from(Path::new("/nonexistent/eduagi.toml"));
        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }
}
