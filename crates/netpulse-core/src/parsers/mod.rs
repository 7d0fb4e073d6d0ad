//! Text parsers for every measurement source.
//!
//! Parsers are pure: raw tool output in, [`ParsedFields`](crate::ParsedFields)
//! out. A pattern that does not match leaves its fields absent; only the
//! speed-test parser reports errors, and the caller recovers from them.

pub mod gateway;
pub mod ping;
pub mod speedtest;
pub mod wifi;

pub use gateway::parse_gateway_speed;
pub use ping::{LocalPingStats, PingScope, parse_gateway_ping, parse_local_ping};
pub use speedtest::{extract_json_line, parse_speedtest};
pub use wifi::{
    NOT_AVAILABLE, WifiReadings, parse_default_gateway, parse_mac_address, parse_wifi_info,
};
