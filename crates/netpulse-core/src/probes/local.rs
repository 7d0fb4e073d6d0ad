//! Local-machine probes: `ping` and the speed-test CLI.

use std::thread;
use std::time::Duration;

use log::{debug, warn};

use super::LocalProbe;
use crate::command::{CommandLine, run_timed};
use crate::config::MonitorConfig;
use crate::error::{ProbeError, SpeedTestError};
use crate::parsers::parse_speedtest;
use crate::record::ParsedFields;

/// Runs the system `ping` binary and the configured speed-test command.
#[derive(Debug, Clone)]
pub struct SystemLocalProbe {
    ping_count: u32,
    ping_timeout: Duration,
    speed_test: Option<CommandLine>,
    speed_test_timeout: Duration,
}

impl SystemLocalProbe {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            ping_count: config.local.ping_count.max(1),
            ping_timeout: Duration::from_secs(config.local.ping_timeout_secs),
            speed_test: CommandLine::from_argv(&config.local.speed_test_command),
            speed_test_timeout: Duration::from_secs(config.local.speed_test_timeout_secs),
        }
    }
}

impl LocalProbe for SystemLocalProbe {
    fn ping(&mut self, target: &str) -> Result<String, ProbeError> {
        let cmd = CommandLine::new("ping")
            .args(["-c".to_string(), self.ping_count.to_string()])
            .arg(target);
        let output = run_timed(&cmd, self.ping_timeout)?;
        // ping exits non-zero when no reply arrives but still prints a
        // summary; 100% loss is a measurement, not a failure.
        if !output.status.success() && output.stdout.contains("packet loss") {
            debug!("ping {target} exited with {} but printed a summary", output.status);
            return Ok(output.stdout);
        }
        output.into_success("ping")
    }

    fn speed_test(&mut self) -> Result<String, ProbeError> {
        let cmd = self
            .speed_test
            .as_ref()
            .ok_or(ProbeError::Disabled("no speed-test command configured"))?;
        run_timed(cmd, self.speed_test_timeout)?.into_success(&cmd.program)
    }
}

/// Run the speed test up to `attempts` times, pausing `retry_delay` between
/// attempts. Any failure (tool error, missing or malformed JSON, reported
/// error) triggers a retry; the last error is returned when all fail.
pub fn collect_speed_test(
    probe: &mut dyn LocalProbe,
    attempts: u32,
    retry_delay: Duration,
) -> Result<ParsedFields, SpeedTestError> {
    let attempts = attempts.max(1);
    let mut last_err = SpeedTestError::NoJson;

    for attempt in 1..=attempts {
        let result = probe
            .speed_test()
            .map_err(SpeedTestError::from)
            .and_then(|stdout| parse_speedtest(&stdout));
        match result {
            Ok(fields) => return Ok(fields),
            Err(e) => {
                warn!("speed test attempt {attempt}/{attempts} failed: {e}");
                last_err = e;
                if attempt < attempts && !retry_delay.is_zero() {
                    thread::sleep(retry_delay);
                }
            }
        }
    }

    Err(last_err)
}
