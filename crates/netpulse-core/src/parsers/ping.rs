//! Ping output parsers.
//!
//! The gateway diagnostics page prints BSD-style summaries with integer loss
//! and a three-part `min/avg/max` line. The local `ping` binary prints either
//! `round-trip min/avg/max/stddev` (macOS) or `rtt min/avg/max/mdev` (Linux),
//! and may report fractional loss.

use std::sync::LazyLock;

use regex::Regex;

use crate::field::{Field, Source};
use crate::record::ParsedFields;

static GATEWAY_LOSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s,])(\d+)% packet loss").expect("static regex")
});

static GATEWAY_RTT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"round-trip min/avg/max = ([\d.]+)/([\d.]+)/([\d.]+) ms").expect("static regex")
});

static LOCAL_LOSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s,])(\d+(?:\.\d+)?)% packet loss").expect("static regex")
});

static LOCAL_RTT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"min/avg/max/(?:stddev|mdev) = ([\d./]+) ms").expect("static regex")
});

// ---------------------------------------------------------------------------
// Gateway ping
// ---------------------------------------------------------------------------

/// Parse the gateway's ping result text.
///
/// Yields `gateway_loss_percentage` and `gateway_rtt_avg_ms` for whichever
/// of the two patterns matched. Unrecognised text yields nothing.
pub fn parse_gateway_ping(text: &str) -> ParsedFields {
    let mut fields = ParsedFields::new();

    if let Some(loss) = GATEWAY_LOSS
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok())
    {
        fields.insert(Field::GatewayLossPercentage, loss);
    }

    if let Some(avg) = GATEWAY_RTT
        .captures(text)
        .and_then(|c| c[2].parse::<f64>().ok())
    {
        fields.insert(Field::GatewayRttAvgMs, avg);
    }

    fields
}

// ---------------------------------------------------------------------------
// Local ping
// ---------------------------------------------------------------------------

/// Which target a local ping measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingScope {
    Wan,
    Gateway,
}

impl PingScope {
    pub fn source(self) -> Source {
        match self {
            PingScope::Wan => Source::LocalWanPing,
            PingScope::Gateway => Source::LocalGatewayPing,
        }
    }

    fn fields(self) -> (Field, Field, Field) {
        match self {
            PingScope::Wan => (
                Field::LocalWanLossPercentage,
                Field::LocalWanRttAvgMs,
                Field::LocalWanPingStddev,
            ),
            PingScope::Gateway => (
                Field::LocalGwLossPercentage,
                Field::LocalGwRttAvgMs,
                Field::LocalGwPingStddev,
            ),
        }
    }
}

/// Summary statistics from one local ping run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalPingStats {
    pub loss_percentage: Option<f64>,
    pub rtt_avg_ms: Option<f64>,
    /// Standard deviation (`stddev`/`mdev`) of the round trips.
    pub jitter_ms: Option<f64>,
}

impl LocalPingStats {
    pub fn is_empty(&self) -> bool {
        self.loss_percentage.is_none() && self.rtt_avg_ms.is_none() && self.jitter_ms.is_none()
    }

    /// Attach the scope's canonical field names.
    pub fn into_fields(self, scope: PingScope) -> ParsedFields {
        let (loss, avg, jitter) = scope.fields();
        let mut fields = ParsedFields::new();
        if let Some(v) = self.loss_percentage {
            fields.insert(loss, v);
        }
        if let Some(v) = self.rtt_avg_ms {
            fields.insert(avg, v);
        }
        if let Some(v) = self.jitter_ms {
            fields.insert(jitter, v);
        }
        fields
    }
}

/// Parse the local `ping` summary.
///
/// The RTT line must carry exactly four slash-separated numbers; anything
/// else drops both the average and the jitter.
pub fn parse_local_ping(text: &str) -> LocalPingStats {
    let mut stats = LocalPingStats::default();

    if let Some(loss) = LOCAL_LOSS
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok())
    {
        stats.loss_percentage = Some(loss);
    }

    if let Some(caps) = LOCAL_RTT.captures(text) {
        let parts: Vec<Option<f64>> = caps[1].split('/').map(|p| p.parse().ok()).collect();
        if let [Some(_min), Some(avg), Some(_max), Some(dev)] = parts.as_slice() {
            stats.rtt_avg_ms = Some(*avg);
            stats.jitter_ms = Some(*dev);
        }
    }

    stats
}
