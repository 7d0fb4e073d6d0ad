//! Monitor configuration.
//!
//! Loaded from an optional TOML file; every section and key has a default,
//! so an empty file (or no file) gives a working setup. The CLI applies its
//! flag overrides on top and then calls [`MonitorConfig::validate`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::threshold::Thresholds;

/// Environment variable consulted first for the gateway access code.
pub const ACCESS_CODE_ENV: &str = "NETPULSE_ACCESS_CODE";

/// Environment variable passed to gateway helpers: `1` headless, `0` visible.
pub const HEADLESS_ENV: &str = "NETPULSE_HEADLESS";

/// Longest accepted run interval, one week.
pub const MAX_RUN_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Shown in place of a configured access code.
pub const REDACTED: &str = "<redacted>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Host pinged by the gateway diagnostics and the local WAN ping.
    pub target_host: String,
    pub log_file: PathBuf,
    pub run_interval_minutes: u64,
    /// Whether gateway helpers should hide their browser window.
    pub headless: bool,
    pub enable_anomaly_highlighting: bool,
    pub gateway: GatewayConfig,
    pub local: LocalConfig,
    pub wifi: WifiConfig,
    pub thresholds: Thresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_host: "google.com".to_string(),
            log_file: PathBuf::from("network_log.csv"),
            run_interval_minutes: 5,
            headless: true,
            enable_anomaly_highlighting: true,
            gateway: GatewayConfig::default(),
            local: LocalConfig::default(),
            wifi: WifiConfig::default(),
            thresholds: Thresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    /// Run the gateway speed test every N cycles. 0 disables it.
    pub speed_test_interval: u32,
    /// `[program, args...]`; the ping target is appended as the last argument.
    pub ping_helper: Vec<String>,
    /// `[program, args...]`; receives the access code via the environment.
    pub speed_helper: Vec<String>,
    pub helper_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.254".to_string(),
            speed_test_interval: 1,
            ping_helper: Vec::new(),
            speed_helper: Vec::new(),
            helper_timeout_secs: 120,
            access_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub run_ping_test: bool,
    pub run_gateway_ping_test: bool,
    pub run_speed_test: bool,
    pub ping_count: u32,
    pub ping_timeout_secs: u64,
    pub speed_test_command: Vec<String>,
    pub speed_test_timeout_secs: u64,
    pub speed_test_attempts: u32,
    pub speed_test_retry_delay_secs: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            run_ping_test: true,
            run_gateway_ping_test: true,
            run_speed_test: true,
            ping_count: 10,
            ping_timeout_secs: 30,
            speed_test_command: ["speedtest", "--format=json", "--accept-license", "--accept-gdpr"]
                .map(String::from)
                .to_vec(),
            speed_test_timeout_secs: 120,
            speed_test_attempts: 3,
            speed_test_retry_delay_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub enabled: bool,
    /// Overrides the platform's info tool. Empty means the default.
    pub info_command: Vec<String>,
    /// Wireless interface for `iw dev <iface> link` on Linux.
    pub interface: String,
    pub command_timeout_secs: u64,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            info_command: Vec::new(),
            interface: "wlan0".to_string(),
            command_timeout_secs: 15,
        }
    }
}

impl MonitorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Copy safe to print: a configured access code is masked.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if shown.gateway.access_code.is_some() {
            shown.gateway.access_code = Some(REDACTED.to_string());
        }
        shown
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_RUN_INTERVAL_MINUTES).contains(&self.run_interval_minutes) {
            return Err(ConfigError::Invalid(format!(
                "run_interval_minutes must be between 1 and {MAX_RUN_INTERVAL_MINUTES}"
            )));
        }
        if self.local.speed_test_attempts < 1 {
            return Err(ConfigError::Invalid(
                "local.speed_test_attempts must be at least 1".to_string(),
            ));
        }
        if self.target_host.trim().is_empty() {
            return Err(ConfigError::Invalid("target_host must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn run_interval(&self) -> Duration {
        Duration::from_secs(self.run_interval_minutes.saturating_mul(60))
    }

    /// True when either gateway helper is configured.
    pub fn gateway_enabled(&self) -> bool {
        !self.gateway.ping_helper.is_empty() || !self.gateway.speed_helper.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::{Direction, ThresholdSetting};

    #[test]
    fn empty_file_gives_defaults() {
        let config = MonitorConfig::from_toml_str("").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = MonitorConfig::from_toml_str(
            r#"
target_host = "1.1.1.1"
run_interval_minutes = 15

[local]
run_speed_test = false

[thresholds.bufferbloat_delta]
limit = 50.0
"#,
        )
        .unwrap();
        assert_eq!(config.target_host, "1.1.1.1");
        assert_eq!(config.run_interval(), Duration::from_secs(900));
        assert!(!config.local.run_speed_test);
        assert!(config.local.run_ping_test);
        assert_eq!(config.local.ping_count, 10);
        assert_eq!(config.thresholds.bufferbloat_delta, ThresholdSetting::limit(50.0));
        assert_eq!(config.thresholds.ping_rtt, ThresholdSetting::limit(100.0));
    }

    #[test]
    fn threshold_direction_parses_lowercase() {
        let config = MonitorConfig::from_toml_str(
            "[thresholds.jitter]\nlimit = 5.0\ndirection = \"less\"\n",
        )
        .unwrap();
        assert_eq!(config.thresholds.jitter.direction, Some(Direction::Less));
    }

    #[test]
    fn threshold_without_limit_is_disabled() {
        let config = MonitorConfig::from_toml_str("[thresholds.packet_loss]\n").unwrap();
        assert_eq!(config.thresholds.packet_loss.limit, None);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = MonitorConfig::from_toml_str("target_host = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let config = MonitorConfig {
            run_interval_minutes: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn huge_interval_is_invalid() {
        let mut config = MonitorConfig::default();
        config.run_interval_minutes = MAX_RUN_INTERVAL_MINUTES;
        assert!(config.validate().is_ok());
        config.run_interval_minutes = u64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert_eq!(config.run_interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn redacted_masks_access_code() {
        let mut config = MonitorConfig::default();
        assert_eq!(config.redacted(), config);

        config.gateway.access_code = Some("0123456789".to_string());
        let text = config.redacted().to_toml_string().unwrap();
        assert!(!text.contains("0123456789"), "{text}");
        assert!(text.contains(REDACTED));
        assert_eq!(config.gateway.access_code.as_deref(), Some("0123456789"));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let mut config = MonitorConfig::default();
        config.local.speed_test_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn toml_output_reloads_identically() {
        let mut config = MonitorConfig::default();
        config.gateway.ping_helper = vec!["gw-ping".to_string(), "--quiet".to_string()];
        config.thresholds.jitter = ThresholdSetting::disabled();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[gateway]"));
        assert_eq!(MonitorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_is_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = MonitorConfig::load(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("netpulse.toml");
        fs::write(&path, "log_file = \"out.csv\"\n[gateway]\nspeed_test_interval = 3\n").unwrap();
        let config = MonitorConfig::load(&path).unwrap();
        assert_eq!(config.log_file, PathBuf::from("out.csv"));
        assert_eq!(config.gateway.speed_test_interval, 3);
    }

    #[test]
    fn gateway_enabled_needs_a_helper() {
        let mut config = MonitorConfig::default();
        assert!(!config.gateway_enabled());
        config.gateway.speed_helper = vec!["gw-speed".to_string()];
        assert!(config.gateway_enabled());
    }
}
