//! # netpulse-core
//!
//! Metric pipeline for a home network health monitor.
//!
//! Each monitoring cycle collects raw text from up to six sources (gateway
//! ping, gateway speed test, local WAN ping, local gateway ping, local speed
//! test and Wi-Fi diagnostics), parses it into partial field maps, merges
//! those into a [`MetricRecord`] with a slot for every canonical [`Field`],
//! derives bufferbloat, and renders the result as a CSV row and a console
//! summary with threshold-based anomaly highlighting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use netpulse_core::{CsvLog, MonitorConfig, MonitorSession, Probes, console_summary};
//!
//! let config = MonitorConfig::default();
//! let mut probes = Probes::system(&config);
//! let mut session = MonitorSession::new(config.clone());
//!
//! let record = session.run_cycle(&mut probes);
//! CsvLog::new(&config.log_file).append(&record).unwrap();
//! print!("{}", console_summary(&record, &config.thresholds, true));
//! ```
//!
//! ## Architecture
//!
//! Probes (raw text) → Parsers ([`ParsedFields`]) → [`RecordBuilder`]
//! (normalize + derive) → [`format`] (CSV / console)
//!
//! Failures never abort a cycle: a source that cannot be measured simply
//! leaves its fields missing, and missing is rendered as `N/A`.

pub mod bufferbloat;
pub mod command;
pub mod config;
pub mod csv_log;
pub mod error;
pub mod field;
pub mod format;
pub mod parsers;
pub mod probes;
pub mod record;
pub mod session;
pub mod threshold;

pub use bufferbloat::Bufferbloat;
pub use config::{GatewayConfig, LocalConfig, MonitorConfig, WifiConfig};
pub use csv_log::CsvLog;
pub use error::{ConfigError, ProbeError, SpeedTestError};
pub use field::{Field, FieldKind, Group, Source};
pub use format::{console_summary, csv_header, csv_row};
pub use probes::{GatewayProbe, LocalProbe, Probes, WifiProbe};
pub use record::{FieldValue, MetricRecord, ParsedFields, RecordBuilder, normalize};
pub use session::{AccessCodePrompt, MonitorSession};
pub use threshold::{Direction, ThresholdRule, ThresholdSetting, Thresholds, is_anomalous};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
