//! Wi-Fi diagnostics parsers.
//!
//! Three independent inputs feed the five Wi-Fi fields: the wireless info
//! tool's `key: value` dump (`wdutil info` on macOS, `iw dev <iface> link`
//! on Linux), the default-route lookup, and the ARP entry for the default
//! gateway. The BSSID is taken from ARP because recent macOS releases redact
//! it in the info dump.

use std::sync::LazyLock;

use regex::Regex;

use crate::field::Field;
use crate::record::{FieldValue, ParsedFields};

/// Sentinel stored for any Wi-Fi key that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:]+?)\s*:\s*(.*?)\s*$").expect("static regex")
});

static ROUTE_GATEWAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*gateway:\s*(\S+)|default via (\S+)").expect("static regex")
});

static MAC_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9A-Fa-f]{1,2}(?::[0-9A-Fa-f]{1,2}){5})\b").expect("static regex")
});

/// Key spellings accepted for each info-dump field, checked in order.
const INFO_KEYS: [(Field, &[&str]); 4] = [
    (Field::WifiRssi, &["RSSI", "signal"]),
    (Field::WifiNoise, &["Noise", "noise"]),
    (
        Field::WifiTxRate,
        &["Tx Rate", "TxRate", "Last Tx Rate", "Max PHY Rate", "tx bitrate"],
    ),
    (Field::WifiChannel, &["Channel", "channel", "freq"]),
];

// ---------------------------------------------------------------------------
// Individual parsers
// ---------------------------------------------------------------------------

/// Extract RSSI, noise, transmit rate and channel from the info dump.
///
/// Values are kept verbatim. The first line whose key matches wins.
pub fn parse_wifi_info(text: &str) -> ParsedFields {
    let mut fields = ParsedFields::new();

    for line in text.lines() {
        let Some(caps) = KEY_VALUE.captures(line) else {
            continue;
        };
        let (key, value) = (&caps[1], &caps[2]);
        if value.is_empty() {
            continue;
        }
        for (field, aliases) in INFO_KEYS {
            if !fields.contains(field) && aliases.contains(&key) {
                fields.insert(field, value);
            }
        }
    }

    fields
}

/// Default gateway IP from `route -n get default` or `ip route show default`.
pub fn parse_default_gateway(text: &str) -> Option<String> {
    let caps = ROUTE_GATEWAY.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// First MAC address in `arp -n <ip>` output. Accepts unpadded octets.
pub fn parse_mac_address(text: &str) -> Option<String> {
    MAC_ADDRESS.captures(text).map(|c| c[1].to_string())
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// The five Wi-Fi fields, each either a verbatim value or [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq)]
pub struct WifiReadings {
    values: [String; 5],
}

impl Default for WifiReadings {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|_| NOT_AVAILABLE.to_string()),
        }
    }
}

impl WifiReadings {
    /// Start from all-unavailable and overwrite what the inputs provide.
    pub fn assemble(info_text: Option<&str>, bssid: Option<String>) -> Self {
        let mut readings = Self::default();
        if let Some(text) = info_text {
            for (field, value) in parse_wifi_info(text) {
                if let FieldValue::Text(s) = value {
                    readings.set(field, s);
                }
            }
        }
        if let Some(mac) = bssid {
            readings.set(Field::WifiBssid, mac);
        }
        readings
    }

    fn slot(field: Field) -> Option<usize> {
        Field::WIFI.iter().position(|f| *f == field)
    }

    pub fn set(&mut self, field: Field, value: String) {
        if let Some(i) = Self::slot(field) {
            self.values[i] = value;
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        Self::slot(field).map(|i| self.values[i].as_str())
    }

    pub fn into_fields(self) -> ParsedFields {
        Field::WIFI
            .into_iter()
            .zip(self.values)
            .map(|(f, v)| (f, FieldValue::Text(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WDUTIL: &str = "\
--------------------------------------------------------------------
WIFI
--------------------------------------------------------------------
    MAC Address          : <redacted> (hw=<redacted>)
    Interface Name       : en0
    SSID                 : <redacted>
    BSSID                : <redacted>
    RSSI                 : -55 dBm
    Noise                : -92 dBm
    Tx Rate              : 866.0 Mbps
    Channel              : 149,80
";

    const IW_LINK: &str = "\
Connected to aa:bb:cc:dd:ee:ff (on wlan0)
\tSSID: home
\tfreq: 5745
\tsignal: -61 dBm
\ttx bitrate: 433.3 MBit/s VHT-MCS 9 80MHz short GI VHT-NSS 1
";

    #[test]
    fn wdutil_info_fields() {
        let f = parse_wifi_info(WDUTIL);
        assert_eq!(f.text(Field::WifiRssi), Some("-55 dBm"));
        assert_eq!(f.text(Field::WifiNoise), Some("-92 dBm"));
        assert_eq!(f.text(Field::WifiTxRate), Some("866.0 Mbps"));
        assert_eq!(f.text(Field::WifiChannel), Some("149,80"));
        assert!(!f.contains(Field::WifiBssid));
    }

    #[test]
    fn iw_link_fields() {
        let f = parse_wifi_info(IW_LINK);
        assert_eq!(f.text(Field::WifiRssi), Some("-61 dBm"));
        assert_eq!(f.text(Field::WifiChannel), Some("5745"));
        assert_eq!(
            f.text(Field::WifiTxRate),
            Some("433.3 MBit/s VHT-MCS 9 80MHz short GI VHT-NSS 1")
        );
        assert!(!f.contains(Field::WifiNoise));
    }

    #[test]
    fn every_info_alias_is_recognised() {
        for (field, aliases) in INFO_KEYS {
            for alias in aliases {
                let f = parse_wifi_info(&format!("  {alias}: 42 x\n"));
                assert_eq!(f.text(field), Some("42 x"), "{alias}");
                assert_eq!(f.len(), 1, "{alias}");
            }
        }
    }

    #[test]
    fn first_alias_match_wins() {
        let f = parse_wifi_info("Tx Rate: 100\nMax PHY Rate: 1200\n");
        assert_eq!(f.text(Field::WifiTxRate), Some("100"));
    }

    #[test]
    fn route_gateway_macos() {
        let text = "   route to: default\ndestination: default\n       mask: default\n    gateway: 192.168.1.254\n  interface: en0\n";
        assert_eq!(parse_default_gateway(text).as_deref(), Some("192.168.1.254"));
    }

    #[test]
    fn route_gateway_linux() {
        let text = "default via 10.0.0.1 dev wlan0 proto dhcp metric 600\n";
        assert_eq!(parse_default_gateway(text).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn route_gateway_absent() {
        assert_eq!(parse_default_gateway("route: writing to routing socket: not in table"), None);
    }

    #[test]
    fn mac_address_unpadded_octets() {
        let arp = "? (192.168.1.254) at 0:1e:c7:a:b:ff on en0 ifscope [ethernet]";
        assert_eq!(parse_mac_address(arp).as_deref(), Some("0:1e:c7:a:b:ff"));
    }

    #[test]
    fn mac_address_linux_arp() {
        let arp = "Address                  HWtype  HWaddress           Flags Mask            Iface\n\
                   192.168.1.254            ether   d4:6e:0e:12:34:56   C                     wlan0\n";
        assert_eq!(parse_mac_address(arp).as_deref(), Some("d4:6e:0e:12:34:56"));
    }

    #[test]
    fn mac_address_incomplete_entry() {
        assert_eq!(parse_mac_address("192.168.1.254 (192.168.1.254) -- no entry"), None);
    }

    #[test]
    fn readings_default_to_not_available() {
        let r = WifiReadings::assemble(None, None);
        for field in Field::WIFI {
            assert_eq!(r.get(field), Some(NOT_AVAILABLE));
        }
        assert_eq!(r.into_fields().len(), 5);
    }

    #[test]
    fn readings_merge_info_and_bssid() {
        let r = WifiReadings::assemble(Some(WDUTIL), Some("a4:5e:60:e1:2b:3c".to_string()));
        assert_eq!(r.get(Field::WifiBssid), Some("a4:5e:60:e1:2b:3c"));
        assert_eq!(r.get(Field::WifiChannel), Some("149,80"));
        assert_eq!(r.get(Field::GatewayRttAvgMs), None);
    }

    #[test]
    fn readings_keep_sentinel_for_unknown_keys() {
        let r = WifiReadings::assemble(Some(IW_LINK), None);
        assert_eq!(r.get(Field::WifiNoise), Some(NOT_AVAILABLE));
        assert_eq!(r.get(Field::WifiBssid), Some(NOT_AVAILABLE));
        assert_eq!(r.get(Field::WifiRssi), Some("-61 dBm"));
    }
}
