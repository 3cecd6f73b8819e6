//! Centralized configuration for admin-server.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than at request time.

use axum::http::HeaderValue;
use domain::destination::DestinationPolicy;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Where destination pages come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagesProvider {
    /// In-memory source: only the synthetic none/home options
    Memory,
    /// SQLite `pages` table
    Sqlite,
}

impl PagesProvider {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("sqlite") {
            Self::Sqlite
        } else {
            Self::Memory
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Server configuration loaded from environment variables.
///
/// All fields are validated at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 3001)
    pub port: u16,
    /// Site root offered as the "home" destination
    pub site_url: String,
    /// Destination page provider
    pub pages_provider: PagesProvider,
    /// SQLite database path (when using sqlite pages)
    pub db_path: PathBuf,
    /// How submitted destinations are checked
    pub destination_policy: DestinationPolicy,
    /// Require the page capability in X-User-Capabilities
    pub enforce_capability: bool,
    /// CORS allow origin for the JSON API
    pub cors_allow_origin: HeaderValue,
    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// Fails fast on invalid configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Port
        let port = match get("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError {
                field: "PORT",
                message: format!("Invalid port '{}'", s),
            })?,
            None => 3001,
        };

        // Site URL
        let site_url = get("SITE_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));
        if !http_common::is_http_url(&site_url) {
            return Err(ConfigError {
                field: "SITE_URL",
                message: format!("Must start with http:// or https://, got '{}'", site_url),
            });
        }

        // Pages provider
        let pages_provider =
            PagesProvider::from_str(&get("PAGES_PROVIDER").unwrap_or_else(|| "memory".into()));

        // DB path (for sqlite)
        let db_path = PathBuf::from(get("DB_PATH").unwrap_or_else(|| "./data/pages.db".into()));

        // Destination policy
        let policy_str = get("DESTINATION_POLICY").unwrap_or_else(|| "trusted".into());
        let destination_policy = DestinationPolicy::parse(&policy_str).ok_or_else(|| ConfigError {
            field: "DESTINATION_POLICY",
            message: format!("Expected 'trusted' or 'validated', got '{}'", policy_str),
        })?;

        // Capability enforcement
        let enforce = get("ENFORCE_CAPABILITY").unwrap_or_default();
        let enforce_capability = matches!(enforce.to_lowercase().as_str(), "1" | "true" | "yes");

        // CORS allow origin
        let cors_origin_str = get("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".into());
        let cors_allow_origin = if cors_origin_str == "*" {
            HeaderValue::from_static("*")
        } else {
            HeaderValue::from_str(&cors_origin_str).map_err(|e| ConfigError {
                field: "CORS_ALLOW_ORIGIN",
                message: format!("Invalid header value '{}': {}", cors_origin_str, e),
            })?
        };

        // Log format
        let log_format = LogFormat::from_str(&get("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));

        Ok(Self {
            port,
            site_url,
            pages_provider,
            db_path,
            destination_policy,
            enforce_capability,
            cors_allow_origin,
            log_format,
        })
    }

    /// Log warnings about permissive configuration.
    pub fn warn_if_insecure(&self) {
        if self.destination_policy == DestinationPolicy::Trusted {
            tracing::warn!(
                "DESTINATION_POLICY=trusted: any submitted select-page URL is used as the \
                 campaign prefix. Set DESTINATION_POLICY=validated to restrict it to offered pages."
            );
        }
        if !self.enforce_capability {
            tracing::warn!(
                "ENFORCE_CAPABILITY not set: the admin page is served without checking \
                 X-User-Capabilities. Only run behind a host that restricts access."
            );
        }
    }
}
