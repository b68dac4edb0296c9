//! Application configuration management.
//!
//! Sources are layered in order: `config/default`, `config/{RUN_MODE}`, then
//! environment variables prefixed with `BRILINK` and separated by `__`
//! (for example `BRILINK__DATABASE__URL`).

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Feature flags.
    #[serde(default)]
    pub features: FeaturesConfig,
    /// Reporting configuration.
    #[serde(default)]
    pub reporting: ReportingConfig,
    /// Background maintenance configuration.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    /// Log output configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token lifetime in hours.
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

fn default_token_expiry_hours() -> i64 {
    24
}

/// Feature flags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturesConfig {
    /// Allows owners to create and delete additional agents.
    #[serde(default)]
    pub multi_agent_enabled: bool,
}

/// Reporting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// IANA time zone used for "today" and date boundaries.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Jakarta".to_string()
}

/// Background maintenance configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceConfig {
    /// Seconds between sweeps of expired revoked tokens.
    #[serde(default = "default_token_sweep_interval")]
    pub token_sweep_interval_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            token_sweep_interval_secs: default_token_sweep_interval(),
        }
    }
}

fn default_token_sweep_interval() -> u64 {
    3600
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl LogConfig {
    /// Returns true when logs should be emitted as JSON lines.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BRILINK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 3] = [
        ("RUN_MODE", Some("test-none")),
        ("BRILINK__DATABASE__URL", Some("postgres://localhost/brilink")),
        ("BRILINK__JWT__SECRET", Some("secret")),
    ];

    #[test]
    fn test_load_applies_defaults() {
        temp_env::with_vars(REQUIRED, || {
            let cfg = AppConfig::load().unwrap();

            assert_eq!(cfg.database.url, "postgres://localhost/brilink");
            assert_eq!(cfg.database.max_connections, 10);
            assert_eq!(cfg.server.port, 5000);
            assert_eq!(cfg.jwt.token_expiry_hours, 24);
            assert!(!cfg.features.multi_agent_enabled);
            assert_eq!(cfg.reporting.timezone, "Asia/Jakarta");
            assert_eq!(cfg.maintenance.token_sweep_interval_secs, 3600);
            assert!(!cfg.log.is_json());
        });
    }

    #[test]
    fn test_load_env_overrides() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-none")),
                ("BRILINK__DATABASE__URL", Some("postgres://db/brilink")),
                ("BRILINK__JWT__SECRET", Some("secret")),
                ("BRILINK__SERVER__PORT", Some("8081")),
                ("BRILINK__FEATURES__MULTI_AGENT_ENABLED", Some("true")),
                ("BRILINK__LOG__FORMAT", Some("json")),
            ],
            || {
                let cfg = AppConfig::load().unwrap();

                assert_eq!(cfg.server.port, 8081);
                assert!(cfg.features.multi_agent_enabled);
                assert!(cfg.log.is_json());
            },
        );
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-none")),
                ("BRILINK__DATABASE__URL", None),
                ("BRILINK__JWT__SECRET", Some("secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
