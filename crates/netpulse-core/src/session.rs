//! Monitoring session: one sequential measurement cycle at a time.
//!
//! The session owns the configuration, counts cycles (the first cycle is 1)
//! and caches the gateway access code once it has been obtained. Each source
//! that fails is logged and left missing; a cycle always yields a record.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};

use crate::config::{ACCESS_CODE_ENV, MonitorConfig};
use crate::field::Source;
use crate::parsers::{PingScope, parse_gateway_ping, parse_gateway_speed, parse_local_ping};
use crate::probes::{Probes, collect_speed_test, collect_wifi};
use crate::record::{MetricRecord, RecordBuilder};

/// Supplies the gateway access code interactively. `None` or an empty
/// string skips the gateway speed test for the current cycle.
pub type AccessCodePrompt = Box<dyn FnMut() -> Option<String>>;

pub struct MonitorSession {
    config: MonitorConfig,
    run_counter: u64,
    access_code: Option<String>,
    prompt: Option<AccessCodePrompt>,
    read_env: bool,
}

impl fmt::Debug for MonitorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorSession")
            .field("run_counter", &self.run_counter)
            .field("access_code_cached", &self.access_code.is_some())
            .field("has_prompt", &self.prompt.is_some())
            .finish()
    }
}

impl MonitorSession {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            run_counter: 0,
            access_code: None,
            prompt: None,
            read_env: true,
        }
    }

    /// Attach the interactive access-code prompt.
    pub fn with_prompt(mut self, prompt: AccessCodePrompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Ignore `NETPULSE_ACCESS_CODE`; used when the environment is not
    /// under the caller's control.
    pub fn without_env_access_code(mut self) -> Self {
        self.read_env = false;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn run_count(&self) -> u64 {
        self.run_counter
    }

    /// Whether the gateway speed test is due on cycle `counter`.
    pub fn gateway_speed_due(interval: u32, counter: u64) -> bool {
        interval > 0 && counter % u64::from(interval) == 0
    }

    /// Cached code, then environment, then config file, then the prompt.
    fn access_code(&mut self) -> Option<String> {
        if let Some(code) = &self.access_code {
            return Some(code.clone());
        }
        let env_code = if self.read_env {
            std::env::var(ACCESS_CODE_ENV).ok()
        } else {
            None
        };
        let code = env_code
            .filter(|c| !c.trim().is_empty())
            .or_else(|| {
                self.config
                    .gateway
                    .access_code
                    .clone()
                    .filter(|c| !c.trim().is_empty())
            })
            .or_else(|| {
                self.prompt
                    .as_mut()
                    .and_then(|prompt| prompt())
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
            })?;
        self.access_code = Some(code.clone());
        Some(code)
    }

    /// Run one cycle stamped with the current local time.
    pub fn run_cycle(&mut self, probes: &mut Probes) -> MetricRecord {
        let now = Local::now().naive_local();
        self.run_cycle_at(now, probes)
    }

    /// Run one cycle with an explicit timestamp.
    pub fn run_cycle_at(&mut self, timestamp: NaiveDateTime, probes: &mut Probes) -> MetricRecord {
        self.run_counter += 1;
        let cycle = self.run_counter;
        info!("cycle {cycle} starting");

        let mut builder = RecordBuilder::new(timestamp);
        let target = self.config.target_host.clone();

        // Gateway diagnostics
        if probes.gateway.can_ping() {
            match probes.gateway.ping_text(&target) {
                Ok(text) => {
                    debug!("gateway ping returned {} bytes", text.len());
                    builder.merge(Source::GatewayPing, parse_gateway_ping(&text));
                }
                Err(e) => warn!("gateway ping failed: {e}"),
            }
        } else {
            debug!("gateway ping not configured");
        }

        if !probes.gateway.can_speed_test() {
            debug!("gateway speed test not configured");
        } else if Self::gateway_speed_due(self.config.gateway.speed_test_interval, cycle) {
            match self.access_code() {
                Some(code) => match probes.gateway.speed_test_text(&code) {
                    Ok(text) => {
                        builder.merge(Source::GatewaySpeed, parse_gateway_speed(&text));
                    }
                    Err(e) => warn!("gateway speed test failed: {e}"),
                },
                None => warn!("no gateway access code; skipping gateway speed test"),
            }
        } else {
            debug!("gateway speed test not due on cycle {cycle}");
        }

        // Local pings
        let local = self.config.local.clone();
        let pings = [
            (local.run_ping_test, PingScope::Wan, target.as_str()),
            (
                local.run_gateway_ping_test,
                PingScope::Gateway,
                self.config.gateway.host.as_str(),
            ),
        ];
        for (enabled, scope, host) in pings {
            if !enabled {
                continue;
            }
            match probes.local.ping(host) {
                Ok(text) => {
                    let stats = parse_local_ping(&text);
                    if stats.is_empty() {
                        warn!("ping {host}: no statistics in output");
                    }
                    builder.merge(scope.source(), stats.into_fields(scope));
                }
                Err(e) => warn!("ping {host} failed: {e}"),
            }
        }

        // Local speed test
        if local.run_speed_test {
            match collect_speed_test(
                probes.local.as_mut(),
                local.speed_test_attempts,
                probes.retry_delay,
            ) {
                Ok(fields) => {
                    builder.merge(Source::LocalSpeedTest, fields);
                }
                Err(e) => warn!("speed test gave no result: {e}"),
            }
        }

        // Wi-Fi
        if self.config.wifi.enabled {
            builder.merge(Source::Wifi, collect_wifi(probes.wifi.as_mut()));
        }

        let record = builder.build();
        info!(
            "cycle {cycle} finished, {} of {} fields missing",
            record.missing_count(),
            crate::field::Field::COUNT
        );
        record
    }
}
