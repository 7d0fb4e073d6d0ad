//! Gateway probes.
//!
//! Driving the gateway's web UI is left to user-supplied helper programs
//! (typically a browser-automation script). netpulse runs them under a
//! timeout and reads the page text they print.

use std::time::Duration;

use log::debug;

use super::GatewayProbe;
use crate::command::{CommandLine, run_timed};
use crate::config::{ACCESS_CODE_ENV, HEADLESS_ENV, MonitorConfig};
use crate::error::ProbeError;

/// Gateway access through external helper commands.
#[derive(Debug, Clone)]
pub struct CommandGateway {
    ping_helper: Option<CommandLine>,
    speed_helper: Option<CommandLine>,
    timeout: Duration,
}

impl CommandGateway {
    pub fn new(
        ping_helper: Option<CommandLine>,
        speed_helper: Option<CommandLine>,
        timeout: Duration,
    ) -> Self {
        Self {
            ping_helper,
            speed_helper,
            timeout,
        }
    }

    /// `None` when neither helper is configured.
    pub fn from_config(config: &MonitorConfig) -> Option<Self> {
        if !config.gateway_enabled() {
            return None;
        }
        let headless = if config.headless { "1" } else { "0" };
        let with_env = |cmd: CommandLine| {
            cmd.env(HEADLESS_ENV, headless)
                .env("NETPULSE_GATEWAY_HOST", config.gateway.host.as_str())
        };
        let ping_helper = CommandLine::from_argv(&config.gateway.ping_helper).map(with_env);
        let speed_helper = CommandLine::from_argv(&config.gateway.speed_helper).map(with_env);
        Some(Self::new(
            ping_helper,
            speed_helper,
            Duration::from_secs(config.gateway.helper_timeout_secs),
        ))
    }

    fn run(&self, cmd: &CommandLine) -> Result<String, ProbeError> {
        let text = run_timed(cmd, self.timeout)?.into_success(&cmd.program)?;
        debug!("{} returned {} bytes", cmd.program, text.len());
        Ok(text)
    }
}

impl GatewayProbe for CommandGateway {
    fn can_ping(&self) -> bool {
        self.ping_helper.is_some()
    }

    fn can_speed_test(&self) -> bool {
        self.speed_helper.is_some()
    }

    fn ping_text(&mut self, target: &str) -> Result<String, ProbeError> {
        let cmd = self
            .ping_helper
            .clone()
            .ok_or(ProbeError::Disabled("no gateway ping helper configured"))?
            .arg(target);
        self.run(&cmd)
    }

    fn speed_test_text(&mut self, access_code: &str) -> Result<String, ProbeError> {
        let cmd = self
            .speed_helper
            .clone()
            .ok_or(ProbeError::Disabled("no gateway speed helper configured"))?
            .env(ACCESS_CODE_ENV, access_code);
        self.run(&cmd)
    }
}

/// Stand-in used when no gateway helpers are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGateway;

impl GatewayProbe for DisabledGateway {
    fn is_enabled(&self) -> bool {
        false
    }

    fn ping_text(&mut self, _target: &str) -> Result<String, ProbeError> {
        Err(ProbeError::Disabled("gateway access not configured"))
    }

    fn speed_test_text(&mut self, _access_code: &str) -> Result<String, ProbeError> {
        Err(ProbeError::Disabled("gateway access not configured"))
    }
}
