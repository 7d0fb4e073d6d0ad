//! Ookla speed-test CLI output parser.
//!
//! The CLI is run with `--format=json` and prints one JSON object on a single
//! line, possibly surrounded by license banners or progress text. Bandwidth
//! is reported in bytes per second and converted to Mbps here.

use serde::Deserialize;

use crate::error::SpeedTestError;
use crate::field::Field;
use crate::record::ParsedFields;

#[derive(Debug, Deserialize)]
struct SpeedtestOutput {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    ping: Option<PingInfo>,
    #[serde(default)]
    download: Option<TransferInfo>,
    #[serde(default)]
    upload: Option<TransferInfo>,
    #[serde(rename = "packetLoss", default)]
    packet_loss: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PingInfo {
    #[serde(default)]
    jitter: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TransferInfo {
    /// Bytes per second.
    #[serde(default)]
    bandwidth: Option<f64>,
    #[serde(default)]
    latency: Option<LoadedLatency>,
}

#[derive(Debug, Deserialize)]
struct LoadedLatency {
    /// Interquartile mean latency while the transfer ran.
    #[serde(default)]
    iqm: Option<f64>,
}

/// Convert a bytes-per-second bandwidth to megabits per second.
pub fn bytes_per_sec_to_mbps(bandwidth: f64) -> f64 {
    bandwidth * 8.0 / 1_000_000.0
}

/// Return the first line that starts with `{`.
pub fn extract_json_line(stdout: &str) -> Result<&str, SpeedTestError> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
        .ok_or(SpeedTestError::NoJson)
}

/// Parse speed-test stdout into local speed-test fields.
///
/// Speeds and loaded latencies are omitted when absent; jitter defaults to
/// `0.0` when the result has no ping section.
pub fn parse_speedtest(stdout: &str) -> Result<ParsedFields, SpeedTestError> {
    let line = extract_json_line(stdout)?;
    let output: SpeedtestOutput = serde_json::from_str(line)?;

    if let Some(err) = output.error {
        let reason = match err {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(SpeedTestError::ToolReported(reason));
    }
    if output.kind.as_deref() == Some("log") && output.level.as_deref() == Some("error") {
        return Err(SpeedTestError::ToolReported(
            output.message.unwrap_or_else(|| "unspecified error".to_string()),
        ));
    }

    let mut fields = ParsedFields::new();

    let jitter = output.ping.and_then(|p| p.jitter).unwrap_or(0.0);
    fields.insert(Field::LocalSpeedtestJitter, jitter);

    if let Some(down) = output.download {
        if let Some(bw) = down.bandwidth {
            fields.insert(Field::LocalDownstreamSpeed, bytes_per_sec_to_mbps(bw));
        }
        if let Some(iqm) = down.latency.and_then(|l| l.iqm) {
            fields.insert(Field::LocalLatencyDownLoadMs, iqm);
        }
    }

    if let Some(up) = output.upload {
        if let Some(bw) = up.bandwidth {
            fields.insert(Field::LocalUpstreamSpeed, bytes_per_sec_to_mbps(bw));
        }
        if let Some(iqm) = up.latency.and_then(|l| l.iqm) {
            fields.insert(Field::LocalLatencyUpLoadMs, iqm);
        }
    }

    if let Some(loss) = output.packet_loss {
        fields.insert(Field::LocalPacketLossPct, loss);
    }

    Ok(fields)
}
