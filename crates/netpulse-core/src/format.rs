//! CSV and console rendering of a [`MetricRecord`].
//!
//! CSV numbers always carry three decimals and missing values are written as
//! `N/A`. The console summary groups fields by origin, prints two decimals
//! (three for jitter and standard deviation) and colours anomalous values.

use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::NaiveDateTime;
use crossterm::style::Stylize;

use crate::field::{Field, FieldKind, Group};
use crate::parsers::NOT_AVAILABLE;
use crate::record::{FieldValue, MetricRecord};
use crate::threshold::{Thresholds, is_anomalous};

/// Text written for a missing value, in CSV and on the console.
pub const MISSING: &str = "N/A";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// `Timestamp` followed by every field's CSV header, comma-joined.
pub fn csv_header() -> String {
    std::iter::once("Timestamp")
        .chain(Field::ALL.iter().map(|f| f.csv_header()))
        .collect::<Vec<_>>()
        .join(",")
}

/// One CSV data row, without the trailing newline.
pub fn csv_row(record: &MetricRecord) -> String {
    let mut row = format_timestamp(record.timestamp());
    for (_, value) in record.iter() {
        row.push(',');
        row.push_str(&csv_cell(value));
    }
    row
}

fn csv_cell(value: Option<&FieldValue>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(MISSING),
        Some(FieldValue::Number(v)) => Cow::Owned(format!("{v:.3}")),
        Some(FieldValue::Text(s)) => quote_csv(s),
    }
}

/// Quote a text cell when it would otherwise break the row.
fn quote_csv(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// How a console value is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Plain,
    /// Non-alert emphasis for informational fields.
    Info,
    /// Threshold crossed.
    Alert,
    Missing,
}

pub fn decorate(text: &str, decoration: Decoration) -> String {
    match decoration {
        Decoration::Plain => text.to_string(),
        Decoration::Info => text.cyan().to_string(),
        Decoration::Alert => text.red().to_string(),
        Decoration::Missing => text.yellow().to_string(),
    }
}

fn with_unit(value: String, unit: &str) -> String {
    match unit {
        "" => value,
        "%" => format!("{value}%"),
        _ => format!("{value} {unit}"),
    }
}

/// Render one field's console value, styled and with its unit.
pub fn render_value(
    record: &MetricRecord,
    field: Field,
    thresholds: &Thresholds,
    highlighting: bool,
) -> String {
    let spec = field.spec();
    match record.get(field) {
        None => decorate(MISSING, Decoration::Missing),
        Some(FieldValue::Text(s)) if s == NOT_AVAILABLE => decorate(s, Decoration::Missing),
        Some(FieldValue::Text(s)) => decorate(s, Decoration::Plain),
        Some(FieldValue::Number(v)) => {
            let rule = thresholds.rule_for(field);
            let decoration = if spec.informational {
                Decoration::Info
            } else if is_anomalous(Some(*v), &rule, highlighting) {
                Decoration::Alert
            } else {
                Decoration::Plain
            };
            let text = format!("{v:.prec$}", prec = rule.precision);
            with_unit(decorate(&text, decoration), rule.unit)
        }
    }
}

/// Fields whose value crosses its threshold. Informational fields are
/// never reported.
pub fn anomalies(record: &MetricRecord, thresholds: &Thresholds, highlighting: bool) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|f| f.kind() == FieldKind::Number && !f.spec().informational)
        .filter(|f| is_anomalous(record.number(*f), &thresholds.rule_for(*f), highlighting))
        .collect()
}

/// Multi-line human summary of a record.
pub fn console_summary(record: &MetricRecord, thresholds: &Thresholds, highlighting: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "--- Network check at {} ---",
        format_timestamp(record.timestamp())
    );

    for group in Group::ALL {
        let _ = writeln!(out, "{}", group.title());
        for field in Field::ALL.into_iter().filter(|f| f.group() == group) {
            let _ = writeln!(
                out,
                "  {}: {}",
                field.label(),
                render_value(record, field, thresholds, highlighting)
            );
        }
    }

    if highlighting {
        let flagged = anomalies(record, thresholds, highlighting);
        if !flagged.is_empty() {
            let names: Vec<_> = flagged.iter().map(|f| f.label()).collect();
            let _ = writeln!(
                out,
                "{}",
                decorate(
                    &format!("{} anomalies: {}", flagged.len(), names.join(", ")),
                    Decoration::Alert
                )
            );
        }
    }

    out
}
