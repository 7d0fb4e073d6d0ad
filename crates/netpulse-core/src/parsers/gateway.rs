//! Gateway speed-test result table parser.
//!
//! The gateway's speed page renders a results table with one row per
//! direction, e.g. `Downstream | 512.34 | Mbps`. When the page is scraped to
//! text, the cells end up separated by tabs, spaces or pipes.

use std::sync::LazyLock;

use regex::Regex;

use crate::field::Field;
use crate::record::ParsedFields;

static SPEED_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(downstream|upstream)\b[\s|]+(\d+(?:\.\d+)?)").expect("static regex")
});

/// Parse `downstream_speed` and `upstream_speed` (Mbps) from the results
/// table. The first row of each direction wins; a missing row leaves its
/// field absent.
pub fn parse_gateway_speed(text: &str) -> ParsedFields {
    let mut fields = ParsedFields::new();

    for line in text.lines() {
        let Some(caps) = SPEED_ROW.captures(line) else {
            continue;
        };
        let field = if caps[1].eq_ignore_ascii_case("downstream") {
            Field::GatewayDownstreamSpeed
        } else {
            Field::GatewayUpstreamSpeed
        };
        if fields.contains(field) {
            continue;
        }
        if let Ok(speed) = caps[2].parse::<f64>() {
            fields.insert(field, speed);
        }
    }

    fields
}
