use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub platform: PlatformConfig,
    pub meyer: MeyerConfig,
    pub taw: TawConfig,
    #[serde(default)]
    pub mode: ModeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ordoro platform configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// API base URL (e.g., "https://api.ordoro.com")
    pub url: String,
    /// Basic auth username
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Tag name used to filter orders awaiting tracking
    #[serde(default = "default_awaiting_tracking_tag")]
    pub awaiting_tracking_tag: String,
    /// Tag id removed once tracking is applied
    pub awaiting_tracking_tag_id: u64,
    /// Maximum orders requested per listing (default: 100)
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Request timeout in seconds; transport default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_awaiting_tracking_tag() -> String {
    "Awaiting Tracking".to_string()
}

fn default_page_limit() -> u32 {
    100
}

/// Meyer (JSON REST supplier) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeyerConfig {
    /// API base URL, without the trailing `/SalesTracking`
    pub url: String,
    /// Value sent verbatim in the Authorization header
    pub auth: String,
    /// Ordoro supplier id for Meyer orders
    pub supplier_id: u64,
    /// Carrier recorded on shipping info (Meyer does not report one)
    #[serde(default = "default_meyer_carrier")]
    pub carrier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_meyer_carrier() -> String {
    "UPS".to_string()
}

/// TAW (XML/form supplier) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TawConfig {
    /// Web service base URL, without the trailing `/GetTrackingInfo`
    pub url: String,
    pub username: String,
    pub password: String,
    /// Ordoro supplier id for TAW orders
    pub supplier_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Order selection lists used by the run mode
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModeConfig {
    /// Orders processed when running in test mode
    #[serde(default)]
    pub test_orders: Vec<String>,
    /// Orders never processed in production mode
    #[serde(default)]
    pub excluded_orders: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Directory receiving the per-run log file
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Sanitized config for startup logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub platform: SanitizedPlatformConfig,
    pub meyer: SanitizedMeyerConfig,
    pub taw: SanitizedTawConfig,
    pub mode: ModeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPlatformConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub awaiting_tracking_tag: String,
    pub awaiting_tracking_tag_id: u64,
    pub page_limit: u32,
}

/// Sanitized Meyer config (auth header hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMeyerConfig {
    pub url: String,
    pub auth_configured: bool,
    pub supplier_id: u64,
    pub carrier: String,
}

/// Sanitized TAW config (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTawConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub supplier_id: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            platform: SanitizedPlatformConfig {
                url: config.platform.url.clone(),
                username: config.platform.username.clone(),
                password_configured: !config.platform.password.is_empty(),
                awaiting_tracking_tag: config.platform.awaiting_tracking_tag.clone(),
                awaiting_tracking_tag_id: config.platform.awaiting_tracking_tag_id,
                page_limit: config.platform.page_limit,
            },
            meyer: SanitizedMeyerConfig {
                url: config.meyer.url.clone(),
                auth_configured: !config.meyer.auth.is_empty(),
                supplier_id: config.meyer.supplier_id,
                carrier: config.meyer.carrier.clone(),
            },
            taw: SanitizedTawConfig {
                url: config.taw.url.clone(),
                username: config.taw.username.clone(),
                password_configured: !config.taw.password.is_empty(),
                supplier_id: config.taw.supplier_id,
            },
            mode: config.mode.clone(),
            logging: config.logging.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const MINIMAL: &str = r#"
[platform]
url = "https://api.ordoro.com"
username = "ordoro-user"
password = "ordoro-pass"
awaiting_tracking_tag_id = 4242

[meyer]
url = "https://meyer.example/api"
auth = "Espresso secret"
supplier_id = 11

[taw]
url = "https://taw.example/ws"
username = "taw-user"
password = "taw-pass"
supplier_id = 22
"#;

    #[test]
    fn test_deserialize_minimal_config_applies_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.platform.awaiting_tracking_tag, "Awaiting Tracking");
        assert_eq!(config.platform.page_limit, 100);
        assert!(config.platform.timeout_secs.is_none());
        assert_eq!(config.meyer.carrier, "UPS");
        assert_eq!(config.taw.supplier_id, 22);
        assert!(config.mode.test_orders.is_empty());
        assert_eq!(config.logging.directory, PathBuf::from("."));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_deserialize_missing_taw_fails() {
        let toml = r#"
[platform]
url = "https://api.ordoro.com"
username = "u"
password = "p"
awaiting_tracking_tag_id = 1

[meyer]
url = "https://meyer.example/api"
auth = "x"
supplier_id = 1
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_mode_lists() {
        let toml = format!(
            "{}\n[mode]\ntest_orders = [\"M-1\", \"M-2\"]\nexcluded_orders = [\"M-9\"]\n",
            MINIMAL
        );
        let config: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.mode.test_orders, vec!["M-1", "M-2"]);
        assert_eq!(config.mode.excluded_orders, vec!["M-9"]);
    }

    #[test]
    fn test_sanitized_config_hides_secrets() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.platform.password_configured);
        assert!(sanitized.meyer.auth_configured);
        assert!(sanitized.taw.password_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("ordoro-pass"));
        assert!(!json.contains("Espresso secret"));
        assert!(!json.contains("taw-pass"));
    }
}
