//! Threshold rules and anomaly classification.
//!
//! A value is anomalous only when it strictly crosses its limit in the
//! configured direction. Missing values, text fields and fields without a
//! configured limit are never anomalous.

use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldKind};

/// Which side of the limit counts as bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Anomalous when `value > limit` (loss, latency, jitter).
    Greater,
    /// Anomalous when `value < limit` (throughput).
    Less,
}

/// Fields sharing one configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdFamily {
    PacketLoss,
    PingRtt,
    Jitter,
    GatewayDownstreamSpeed,
    GatewayUpstreamSpeed,
    LocalDownstreamSpeed,
    LocalUpstreamSpeed,
    BufferbloatDelta,
    LatencyUnderLoad,
    SpeedtestPacketLoss,
}

impl ThresholdFamily {
    /// Direction used when the config entry does not name one.
    pub fn natural_direction(self) -> Direction {
        match self {
            ThresholdFamily::GatewayDownstreamSpeed
            | ThresholdFamily::GatewayUpstreamSpeed
            | ThresholdFamily::LocalDownstreamSpeed
            | ThresholdFamily::LocalUpstreamSpeed => Direction::Less,
            _ => Direction::Greater,
        }
    }
}

// ---------------------------------------------------------------------------
// Configured limits
// ---------------------------------------------------------------------------

/// One `[thresholds.<family>]` table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdSetting {
    /// `None` disables classification for the family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl ThresholdSetting {
    pub fn limit(limit: f64) -> Self {
        Self {
            limit: Some(limit),
            direction: None,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

/// The `[thresholds]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub packet_loss: ThresholdSetting,
    pub ping_rtt: ThresholdSetting,
    pub jitter: ThresholdSetting,
    pub gateway_downstream_speed: ThresholdSetting,
    pub gateway_upstream_speed: ThresholdSetting,
    pub local_downstream_speed: ThresholdSetting,
    pub local_upstream_speed: ThresholdSetting,
    pub bufferbloat_delta: ThresholdSetting,
    pub latency_under_load: ThresholdSetting,
    pub speedtest_packet_loss: ThresholdSetting,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            packet_loss: ThresholdSetting::limit(1.0),
            ping_rtt: ThresholdSetting::limit(100.0),
            jitter: ThresholdSetting::limit(30.0),
            gateway_downstream_speed: ThresholdSetting::limit(50.0),
            gateway_upstream_speed: ThresholdSetting::limit(10.0),
            local_downstream_speed: ThresholdSetting::limit(50.0),
            local_upstream_speed: ThresholdSetting::limit(10.0),
            bufferbloat_delta: ThresholdSetting::limit(30.0),
            latency_under_load: ThresholdSetting::limit(150.0),
            speedtest_packet_loss: ThresholdSetting::limit(1.0),
        }
    }
}

impl Thresholds {
    pub fn setting(&self, family: ThresholdFamily) -> ThresholdSetting {
        match family {
            ThresholdFamily::PacketLoss => self.packet_loss,
            ThresholdFamily::PingRtt => self.ping_rtt,
            ThresholdFamily::Jitter => self.jitter,
            ThresholdFamily::GatewayDownstreamSpeed => self.gateway_downstream_speed,
            ThresholdFamily::GatewayUpstreamSpeed => self.gateway_upstream_speed,
            ThresholdFamily::LocalDownstreamSpeed => self.local_downstream_speed,
            ThresholdFamily::LocalUpstreamSpeed => self.local_upstream_speed,
            ThresholdFamily::BufferbloatDelta => self.bufferbloat_delta,
            ThresholdFamily::LatencyUnderLoad => self.latency_under_load,
            ThresholdFamily::SpeedtestPacketLoss => self.speedtest_packet_loss,
        }
    }

    /// Resolve the effective rule for one field.
    pub fn rule_for(&self, field: Field) -> ThresholdRule {
        let spec = field.spec();
        let (limit, direction) = match spec.threshold {
            Some(family) if spec.kind == FieldKind::Number => {
                let setting = self.setting(family);
                (
                    setting.limit,
                    setting
                        .direction
                        .unwrap_or_else(|| family.natural_direction()),
                )
            }
            _ => (None, Direction::Greater),
        };
        ThresholdRule {
            limit,
            direction,
            precision: spec.precision,
            unit: spec.unit,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Effective per-field rule: limit, direction and console formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRule {
    pub limit: Option<f64>,
    pub direction: Direction,
    pub precision: usize,
    pub unit: &'static str,
}

impl ThresholdRule {
    /// Strict comparison against the limit. Equality is never anomalous.
    pub fn is_anomalous(&self, value: Option<f64>, highlighting: bool) -> bool {
        is_anomalous(value, self, highlighting)
    }
}

/// Classify a value against its rule.
///
/// Returns `false` when highlighting is disabled, the value is missing or not
/// finite, or the rule has no limit.
pub fn is_anomalous(value: Option<f64>, rule: &ThresholdRule, highlighting: bool) -> bool {
    if !highlighting {
        return false;
    }
    let (Some(value), Some(limit)) = (value, rule.limit) else {
        return false;
    };
    if !value.is_finite() {
        return false;
    }
    match rule.direction {
        Direction::Greater => value > limit,
        Direction::Less => value < limit,
    }
}
