//! Wi-Fi diagnostics collection.

use std::time::Duration;

use log::{debug, warn};

use super::WifiProbe;
use crate::command::{CommandLine, run_timed};
use crate::config::MonitorConfig;
use crate::error::ProbeError;
use crate::parsers::{WifiReadings, parse_default_gateway, parse_mac_address};
use crate::record::ParsedFields;

/// Platform tools: `wdutil`/`route`/`arp` on macOS, `iw`/`ip`/`arp` elsewhere.
#[derive(Debug, Clone)]
pub struct SystemWifiProbe {
    info_command: CommandLine,
    timeout: Duration,
}

impl SystemWifiProbe {
    pub fn from_config(config: &MonitorConfig) -> Self {
        let info_command = CommandLine::from_argv(&config.wifi.info_command)
            .unwrap_or_else(|| default_info_command(&config.wifi.interface));
        Self {
            info_command,
            timeout: Duration::from_secs(config.wifi.command_timeout_secs),
        }
    }

    fn run(&self, cmd: &CommandLine) -> Result<String, ProbeError> {
        run_timed(cmd, self.timeout)?.into_success(&cmd.program)
    }
}

fn default_info_command(interface: &str) -> CommandLine {
    if cfg!(target_os = "macos") {
        CommandLine::new("wdutil").arg("info")
    } else {
        CommandLine::new("iw").args(["dev", interface, "link"])
    }
}

fn default_route_command() -> CommandLine {
    if cfg!(target_os = "macos") {
        CommandLine::new("route").args(["-n", "get", "default"])
    } else {
        CommandLine::new("ip").args(["route", "show", "default"])
    }
}

impl WifiProbe for SystemWifiProbe {
    fn info_text(&mut self) -> Result<String, ProbeError> {
        self.run(&self.info_command)
    }

    fn default_route_text(&mut self) -> Result<String, ProbeError> {
        self.run(&default_route_command())
    }

    fn warm_arp(&mut self, ip: &str) -> Result<(), ProbeError> {
        let cmd = CommandLine::new("ping").args(["-c", "1", ip]);
        run_timed(&cmd, self.timeout).map(|_| ())
    }

    fn arp_text(&mut self, ip: &str) -> Result<String, ProbeError> {
        self.run(&CommandLine::new("arp").args(["-n", ip]))
    }
}

/// Gather all five Wi-Fi fields. Every step may fail independently; the
/// affected keys keep their `N/A` sentinel.
pub fn collect_wifi(probe: &mut dyn WifiProbe) -> ParsedFields {
    let info = probe
        .info_text()
        .map_err(|e| warn!("wi-fi info unavailable: {e}"))
        .ok();

    let bssid = probe
        .default_route_text()
        .map_err(|e| warn!("default route lookup failed: {e}"))
        .ok()
        .and_then(|text| parse_default_gateway(&text))
        .and_then(|ip| {
            debug!("default gateway is {ip}");
            if let Err(e) = probe.warm_arp(&ip) {
                debug!("arp warm-up ping to {ip} failed: {e}");
            }
            probe
                .arp_text(&ip)
                .map_err(|e| warn!("arp lookup for {ip} failed: {e}"))
                .ok()
                .and_then(|text| parse_mac_address(&text))
        });

    WifiReadings::assemble(info.as_deref(), bssid).into_fields()
}
