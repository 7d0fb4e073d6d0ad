//! Measurement collaborators.
//!
//! Each external data source sits behind a trait so that the session can be
//! driven by real tools or by test fakes. Implementations return raw text;
//! parsing happens in [`crate::parsers`].

pub mod gateway;
pub mod local;
pub mod wifi;

pub use gateway::{CommandGateway, DisabledGateway};
pub use local::{SystemLocalProbe, collect_speed_test};
pub use wifi::{SystemWifiProbe, collect_wifi};

use std::time::Duration;

use crate::config::MonitorConfig;
use crate::error::ProbeError;

/// The ISP gateway's web diagnostics.
pub trait GatewayProbe {
    /// False when no gateway access is configured; the session then skips
    /// both gateway measurements without logging failures.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Whether [`ping_text`](Self::ping_text) can run at all.
    fn can_ping(&self) -> bool {
        self.is_enabled()
    }

    /// Whether [`speed_test_text`](Self::speed_test_text) can run at all.
    /// The session only resolves an access code when this holds.
    fn can_speed_test(&self) -> bool {
        self.is_enabled()
    }

    /// Run the gateway's ping diagnostic against `target`, returning the
    /// result text.
    fn ping_text(&mut self, target: &str) -> Result<String, ProbeError>;

    /// Run the gateway's speed test, returning the results table text.
    fn speed_test_text(&mut self, access_code: &str) -> Result<String, ProbeError>;
}

/// Tools run on the monitoring machine itself.
pub trait LocalProbe {
    /// Raw `ping` output for `target`.
    fn ping(&mut self, target: &str) -> Result<String, ProbeError>;

    /// Raw stdout of one speed-test attempt.
    fn speed_test(&mut self) -> Result<String, ProbeError>;
}

/// Wireless link and default-gateway lookups.
pub trait WifiProbe {
    fn info_text(&mut self) -> Result<String, ProbeError>;

    fn default_route_text(&mut self) -> Result<String, ProbeError>;

    /// Send one ICMP probe so the gateway lands in the ARP cache.
    fn warm_arp(&mut self, ip: &str) -> Result<(), ProbeError>;

    fn arp_text(&mut self, ip: &str) -> Result<String, ProbeError>;
}

/// One cycle's collaborators.
pub struct Probes {
    pub gateway: Box<dyn GatewayProbe>,
    pub local: Box<dyn LocalProbe>,
    pub wifi: Box<dyn WifiProbe>,
    /// Pause between speed-test attempts.
    pub retry_delay: Duration,
}

impl Probes {
    /// Real-tool probes built from the configuration.
    pub fn system(config: &MonitorConfig) -> Self {
        let gateway: Box<dyn GatewayProbe> = match CommandGateway::from_config(config) {
            Some(gw) => Box::new(gw),
            None => Box::new(DisabledGateway),
        };
        Self {
            gateway,
            local: Box::new(SystemLocalProbe::from_config(config)),
            wifi: Box::new(SystemWifiProbe::from_config(config)),
            retry_delay: Duration::from_secs(config.local.speed_test_retry_delay_secs),
        }
    }
}
