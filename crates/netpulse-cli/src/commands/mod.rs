pub mod config;
pub mod once;
pub mod run;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use log::{info, warn};
use netpulse_core::{
    ConfigError, CsvLog, MetricRecord, MonitorConfig, MonitorSession, console_summary,
};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "netpulse.toml";

/// Flags that override the config file. Accepted before or after the
/// subcommand.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// TOML config file (default: ./netpulse.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV file results are appended to
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Host pinged by the gateway and local WAN ping tests
    #[arg(long, global = true)]
    pub target: Option<String>,

    /// Minutes between checks
    #[arg(long, global = true)]
    pub interval_minutes: Option<u64>,

    /// Disable red anomaly highlighting in the console summary
    #[arg(long, global = true)]
    pub no_highlight: bool,

    /// Skip the local ping to the target host
    #[arg(long, global = true)]
    pub skip_local_ping: bool,

    /// Skip the local ping to the gateway
    #[arg(long, global = true)]
    pub skip_gateway_ping: bool,

    /// Skip the local speed test
    #[arg(long, global = true)]
    pub skip_speed_test: bool,

    /// Run the gateway speed test every N checks (0 disables it)
    #[arg(long, global = true)]
    pub gateway_speed_interval: Option<u32>,

    /// Ask gateway helpers to run their browser headless
    #[arg(long, global = true, conflicts_with = "visible")]
    pub headless: bool,

    /// Ask gateway helpers to show their browser window
    #[arg(long, global = true)]
    pub visible: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut MonitorConfig) {
        if let Some(path) = &self.log_file {
            config.log_file = path.clone();
        }
        if let Some(target) = &self.target {
            config.target_host = target.clone();
        }
        if let Some(minutes) = self.interval_minutes {
            config.run_interval_minutes = minutes;
        }
        if let Some(n) = self.gateway_speed_interval {
            config.gateway.speed_test_interval = n;
        }
        if self.no_highlight {
            config.enable_anomaly_highlighting = false;
        }
        if self.skip_local_ping {
            config.local.run_ping_test = false;
        }
        if self.skip_gateway_ping {
            config.local.run_gateway_ping_test = false;
        }
        if self.skip_speed_test {
            config.local.run_speed_test = false;
        }
        if self.headless {
            config.headless = true;
        }
        if self.visible {
            config.headless = false;
        }
    }
}

/// Load the config file (if any), apply flag overrides and validate.
pub fn load_config(overrides: &Overrides) -> Result<MonitorConfig, ConfigError> {
    let mut config = match &overrides.config {
        Some(path) => MonitorConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            MonitorConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => MonitorConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Ask for the gateway access code on the terminal.
fn prompt_access_code() -> Option<String> {
    eprint!("Gateway access code (printed on the gateway label): ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

pub fn make_session(config: MonitorConfig) -> MonitorSession {
    MonitorSession::new(config).with_prompt(Box::new(prompt_access_code))
}

/// Append the record to the CSV log and print the console summary.
pub fn emit(record: &MetricRecord, config: &MonitorConfig) {
    let log = CsvLog::new(&config.log_file);
    match log.append(record) {
        Ok(()) => info!("results appended to {}", log.path().display()),
        Err(e) => warn!("could not write {}: {e}", log.path().display()),
    }
    println!();
    print!(
        "{}",
        console_summary(
            record,
            &config.thresholds,
            config.enable_anomaly_highlighting
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let overrides = Overrides {
            log_file: Some(PathBuf::from("custom.csv")),
            target: Some("1.1.1.1".to_string()),
            interval_minutes: Some(15),
            gateway_speed_interval: Some(0),
            no_highlight: true,
            skip_local_ping: true,
            skip_speed_test: true,
            visible: true,
            ..Overrides::default()
        };
        let mut config = MonitorConfig::default();
        overrides.apply(&mut config);

        assert_eq!(config.log_file, PathBuf::from("custom.csv"));
        assert_eq!(config.target_host, "1.1.1.1");
        assert_eq!(config.run_interval_minutes, 15);
        assert_eq!(config.gateway.speed_test_interval, 0);
        assert!(!config.enable_anomaly_highlighting);
        assert!(!config.local.run_ping_test);
        assert!(config.local.run_gateway_ping_test);
        assert!(!config.local.run_speed_test);
        assert!(!config.headless);
    }

    #[test]
    fn no_overrides_keep_defaults() {
        let mut config = MonitorConfig::default();
        Overrides::default().apply(&mut config);
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn load_config_reads_file_then_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("netpulse.toml");
        std::fs::write(&path, "target_host = \"example.org\"\nrun_interval_minutes = 10\n").unwrap();
        let overrides = Overrides {
            config: Some(path),
            interval_minutes: Some(2),
            ..Overrides::default()
        };
        let config = load_config(&overrides).unwrap();
        assert_eq!(config.target_host, "example.org");
        assert_eq!(config.run_interval_minutes, 2);
    }

    #[test]
    fn load_config_surfaces_errors() {
        let overrides = Overrides {
            config: Some(PathBuf::from("/nonexistent/netpulse.toml")),
            ..Overrides::default()
        };
        assert!(matches!(load_config(&overrides), Err(ConfigError::Read { .. })));

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("netpulse.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = Overrides {
            config: Some(path),
            interval_minutes: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(load_config(&overrides), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn emit_appends_to_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = MonitorConfig {
            log_file: tmp.path().join("out.csv"),
            ..MonitorConfig::default()
        };
        let ts = chrono::NaiveDate::from_ymd_opt(2025, 8, 6)
            .and_then(|d| d.and_hms_opt(22, 0, 0))
            .unwrap();
        let record = MetricRecord::empty(ts);
        emit(&record, &config);
        emit(&record, &config);
        let text = std::fs::read_to_string(&config.log_file).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().starts_with("2025-08-06 22:00:00,N/A,"));
    }
}
