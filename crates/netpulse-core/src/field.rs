//! Canonical metric fields.
//!
//! Every value a monitoring cycle can produce is named by exactly one
//! [`Field`]. The variant order is the CSV column order after `Timestamp`;
//! new fields may only be appended so that existing log files stay
//! append-compatible.
//!
//! Per-field metadata (canonical name, CSV header, console label, producing
//! source, display precision, threshold family) lives in one static table,
//! [`FIELD_SPECS`], indexed by the enum discriminant.

use std::fmt;

use crate::threshold::ThresholdFamily;

// ---------------------------------------------------------------------------
// Sources and console groups
// ---------------------------------------------------------------------------

/// The measurement that produces a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    GatewayPing,
    GatewaySpeed,
    LocalWanPing,
    LocalGatewayPing,
    LocalSpeedTest,
    /// Computed from other fields after normalization.
    Derived,
    Wifi,
}

impl Source {
    pub fn group(self) -> Group {
        match self {
            Source::GatewayPing | Source::GatewaySpeed => Group::Gateway,
            Source::LocalWanPing
            | Source::LocalGatewayPing
            | Source::LocalSpeedTest
            | Source::Derived => Group::LocalMachine,
            Source::Wifi => Group::Wifi,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::GatewayPing => "gateway ping",
            Source::GatewaySpeed => "gateway speed test",
            Source::LocalWanPing => "local WAN ping",
            Source::LocalGatewayPing => "local gateway ping",
            Source::LocalSpeedTest => "local speed test",
            Source::Derived => "derived",
            Source::Wifi => "wi-fi",
        };
        f.write_str(name)
    }
}

/// Console summary section a field is printed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Gateway,
    LocalMachine,
    Wifi,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Gateway, Group::LocalMachine, Group::Wifi];

    pub fn title(self) -> &'static str {
        match self {
            Group::Gateway => "Gateway",
            Group::LocalMachine => "Local Machine",
            Group::Wifi => "Wi-Fi",
        }
    }
}

/// Whether a field carries a number or verbatim text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    GatewayLossPercentage,
    GatewayRttAvgMs,
    GatewayDownstreamSpeed,
    GatewayUpstreamSpeed,
    LocalWanLossPercentage,
    LocalWanRttAvgMs,
    LocalWanPingStddev,
    LocalGwLossPercentage,
    LocalGwRttAvgMs,
    LocalGwPingStddev,
    LocalDownstreamSpeed,
    LocalUpstreamSpeed,
    LocalSpeedtestJitter,
    LocalLatencyDownLoadMs,
    LocalLatencyUpLoadMs,
    LocalPacketLossPct,
    DownloadBufferbloatMs,
    UploadBufferbloatMs,
    WifiBssid,
    WifiChannel,
    WifiRssi,
    WifiNoise,
    WifiTxRate,
}

/// Static metadata for one [`Field`].
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    /// Canonical snake_case key used in logs and config.
    pub name: &'static str,
    pub csv_header: &'static str,
    /// Console label, printed as `<label>: <value>`.
    pub label: &'static str,
    pub source: Source,
    pub kind: FieldKind,
    pub unit: &'static str,
    /// Decimal places on the console. CSV always uses three.
    pub precision: usize,
    pub threshold: Option<ThresholdFamily>,
    /// Always shown with the informational decoration, never as an alert.
    pub informational: bool,
}

#[allow(clippy::too_many_arguments)]
const fn number(
    field: Field,
    name: &'static str,
    csv_header: &'static str,
    label: &'static str,
    source: Source,
    unit: &'static str,
    precision: usize,
    threshold: ThresholdFamily,
) -> FieldSpec {
    FieldSpec {
        field,
        name,
        csv_header,
        label,
        source,
        kind: FieldKind::Number,
        unit,
        precision,
        threshold: Some(threshold),
        informational: false,
    }
}

const fn text(
    field: Field,
    name: &'static str,
    csv_header: &'static str,
    label: &'static str,
) -> FieldSpec {
    FieldSpec {
        field,
        name,
        csv_header,
        label,
        source: Source::Wifi,
        kind: FieldKind::Text,
        unit: "",
        precision: 0,
        threshold: None,
        informational: false,
    }
}

const fn informational(spec: FieldSpec) -> FieldSpec {
    FieldSpec {
        informational: true,
        ..spec
    }
}

use self::Field as F;
use self::Source as S;
use crate::threshold::ThresholdFamily as T;

/// Metadata for every field, in CSV column order.
#[rustfmt::skip]
pub static FIELD_SPECS: [FieldSpec; Field::COUNT] = [
    number(F::GatewayLossPercentage, "gateway_loss_percentage", "Gateway_LossPercentage", "Packet Loss", S::GatewayPing, "%", 2, T::PacketLoss),
    number(F::GatewayRttAvgMs, "gateway_rtt_avg_ms", "Gateway_RTT_avg_ms", "Average RTT", S::GatewayPing, "ms", 2, T::PingRtt),
    number(F::GatewayDownstreamSpeed, "downstream_speed", "Gateway_Downstream_Mbps", "Downstream Speed", S::GatewaySpeed, "Mbps", 2, T::GatewayDownstreamSpeed),
    number(F::GatewayUpstreamSpeed, "upstream_speed", "Gateway_Upstream_Mbps", "Upstream Speed", S::GatewaySpeed, "Mbps", 2, T::GatewayUpstreamSpeed),
    number(F::LocalWanLossPercentage, "local_wan_loss_percentage", "Local_WAN_LossPercentage", "WAN Packet Loss", S::LocalWanPing, "%", 2, T::PacketLoss),
    number(F::LocalWanRttAvgMs, "local_wan_rtt_avg_ms", "Local_WAN_RTT_avg_ms", "WAN Average RTT", S::LocalWanPing, "ms", 2, T::PingRtt),
    number(F::LocalWanPingStddev, "local_wan_ping_stddev", "Local_WAN_Ping_StdDev", "WAN Jitter (StdDev)", S::LocalWanPing, "ms", 3, T::Jitter),
    number(F::LocalGwLossPercentage, "local_gw_loss_percentage", "Local_GW_LossPercentage", "Gateway Packet Loss", S::LocalGatewayPing, "%", 2, T::PacketLoss),
    informational(number(F::LocalGwRttAvgMs, "local_gw_rtt_avg_ms", "Local_GW_RTT_avg_ms", "Gateway Average RTT", S::LocalGatewayPing, "ms", 2, T::PingRtt)),
    number(F::LocalGwPingStddev, "local_gw_ping_stddev", "Local_GW_Ping_StdDev", "Gateway Jitter (StdDev)", S::LocalGatewayPing, "ms", 3, T::Jitter),
    number(F::LocalDownstreamSpeed, "local_downstream_speed", "Local_Downstream_Mbps", "Download Speed", S::LocalSpeedTest, "Mbps", 2, T::LocalDownstreamSpeed),
    number(F::LocalUpstreamSpeed, "local_upstream_speed", "Local_Upstream_Mbps", "Upload Speed", S::LocalSpeedTest, "Mbps", 2, T::LocalUpstreamSpeed),
    number(F::LocalSpeedtestJitter, "local_speedtest_jitter", "Local_Speedtest_Jitter_ms", "Speed Test Jitter", S::LocalSpeedTest, "ms", 3, T::Jitter),
    number(F::LocalLatencyDownLoadMs, "local_latency_down_load_ms", "Local_Latency_Down_Load_ms", "Latency Under Download", S::LocalSpeedTest, "ms", 2, T::LatencyUnderLoad),
    number(F::LocalLatencyUpLoadMs, "local_latency_up_load_ms", "Local_Latency_Up_Load_ms", "Latency Under Upload", S::LocalSpeedTest, "ms", 2, T::LatencyUnderLoad),
    number(F::LocalPacketLossPct, "local_packet_loss_pct", "Local_Packet_Loss_Pct", "Speed Test Packet Loss", S::LocalSpeedTest, "%", 2, T::SpeedtestPacketLoss),
    number(F::DownloadBufferbloatMs, "download_bufferbloat_ms", "Download_Bufferbloat_ms", "Download Bufferbloat", S::Derived, "ms", 2, T::BufferbloatDelta),
    number(F::UploadBufferbloatMs, "upload_bufferbloat_ms", "Upload_Bufferbloat_ms", "Upload Bufferbloat", S::Derived, "ms", 2, T::BufferbloatDelta),
    text(F::WifiBssid, "wifi_bssid", "WiFi_BSSID", "BSSID"),
    text(F::WifiChannel, "wifi_channel", "WiFi_Channel", "Channel"),
    text(F::WifiRssi, "wifi_rssi", "WiFi_RSSI", "RSSI"),
    text(F::WifiNoise, "wifi_noise", "WiFi_Noise", "Noise"),
    text(F::WifiTxRate, "wifi_tx_rate", "WiFi_TxRate_Mbps", "Tx Rate"),
];

impl Field {
    pub const ALL: [Field; 23] = [
        F::GatewayLossPercentage,
        F::GatewayRttAvgMs,
        F::GatewayDownstreamSpeed,
        F::GatewayUpstreamSpeed,
        F::LocalWanLossPercentage,
        F::LocalWanRttAvgMs,
        F::LocalWanPingStddev,
        F::LocalGwLossPercentage,
        F::LocalGwRttAvgMs,
        F::LocalGwPingStddev,
        F::LocalDownstreamSpeed,
        F::LocalUpstreamSpeed,
        F::LocalSpeedtestJitter,
        F::LocalLatencyDownLoadMs,
        F::LocalLatencyUpLoadMs,
        F::LocalPacketLossPct,
        F::DownloadBufferbloatMs,
        F::UploadBufferbloatMs,
        F::WifiBssid,
        F::WifiChannel,
        F::WifiRssi,
        F::WifiNoise,
        F::WifiTxRate,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// The Wi-Fi text fields, in column order.
    pub const WIFI: [Field; 5] = [
        F::WifiBssid,
        F::WifiChannel,
        F::WifiRssi,
        F::WifiNoise,
        F::WifiTxRate,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn csv_header(self) -> &'static str {
        self.spec().csv_header
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn source(self) -> Source {
        self.spec().source
    }

    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }

    pub fn group(self) -> Group {
        self.source().group()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
