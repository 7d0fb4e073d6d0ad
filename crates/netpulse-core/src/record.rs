//! Parsed fields, the normalized metric record, and the normalizer.
//!
//! Parsers emit partial [`ParsedFields`]. [`RecordBuilder`] merges them into
//! a [`MetricRecord`] that has a slot for every canonical [`Field`], filling
//! the derived bufferbloat fields last.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use log::debug;

use crate::bufferbloat::Bufferbloat;
use crate::field::{Field, Source};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedFields
// ---------------------------------------------------------------------------

/// Partial mapping produced by one parser. Absent keys mean "not found".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFields {
    values: BTreeMap<Field, FieldValue>,
}

impl ParsedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used when constructing a result.
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub(crate) fn insert(&mut self, field: Field, value: impl Into<FieldValue>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }
}

impl FromIterator<(Field, FieldValue)> for ParsedFields {
    fn from_iter<I: IntoIterator<Item = (Field, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ParsedFields {
    type Item = (Field, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<Field, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

// ---------------------------------------------------------------------------
// MetricRecord
// ---------------------------------------------------------------------------

/// One cycle's results. Every canonical field has a slot; `None` is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    timestamp: NaiveDateTime,
    values: [Option<FieldValue>; Field::COUNT],
}

impl MetricRecord {
    /// A record with every field missing.
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: std::array::from_fn(|_| None),
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values[field.index()].as_ref()
    }

    pub fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn is_missing(&self, field: Field) -> bool {
        self.values[field.index()].is_none()
    }

    /// All fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&FieldValue>)> {
        Field::ALL
            .iter()
            .map(move |f| (*f, self.values[f.index()].as_ref()))
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Merges per-source parser output into a [`MetricRecord`].
///
/// Each field is accepted only from the source that owns it, and the first
/// value offered for a field wins.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: MetricRecord,
}

impl RecordBuilder {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            record: MetricRecord::empty(timestamp),
        }
    }

    pub fn merge(&mut self, source: Source, fields: ParsedFields) -> &mut Self {
        if source == Source::Derived {
            debug!("ignoring {} externally supplied derived fields", fields.len());
            return self;
        }
        for (field, value) in fields {
            if field.source() != source {
                debug!("{source} offered {field}, which belongs to {}", field.source());
                continue;
            }
            let slot = &mut self.record.values[field.index()];
            if slot.is_some() {
                debug!("{field} already set, keeping first value");
                continue;
            }
            *slot = Some(value);
        }
        self
    }

    /// Compute derived fields and return the finished record.
    pub fn build(mut self) -> MetricRecord {
        let bloat = Bufferbloat::from_record(&self.record);
        self.record.values[Field::DownloadBufferbloatMs.index()] =
            bloat.download_ms.map(FieldValue::Number);
        self.record.values[Field::UploadBufferbloatMs.index()] =
            bloat.upload_ms.map(FieldValue::Number);
        self.record
    }
}

/// Normalize a batch of source results in one call.
pub fn normalize(
    timestamp: NaiveDateTime,
    sources: impl IntoIterator<Item = (Source, ParsedFields)>,
) -> MetricRecord {
    let mut builder = RecordBuilder::new(timestamp);
    for (source, fields) in sources {
        builder.merge(source, fields);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 6)
            .and_then(|d| d.and_hms_opt(22, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn empty_input_gives_all_missing() {
        let record = normalize(ts(), []);
        assert_eq!(record.missing_count(), Field::COUNT);
        assert_eq!(record.iter().count(), Field::COUNT);
    }

    #[test]
    fn fields_land_in_their_slots() {
        let ping = ParsedFields::new()
            .with(Field::GatewayLossPercentage, 0.0)
            .with(Field::GatewayRttAvgMs, 15.2);
        let record = normalize(ts(), [(Source::GatewayPing, ping)]);
        assert_eq!(record.number(Field::GatewayLossPercentage), Some(0.0));
        assert_eq!(record.number(Field::GatewayRttAvgMs), Some(15.2));
        assert!(record.is_missing(Field::LocalWanRttAvgMs));
    }

    #[test]
    fn zero_is_not_missing() {
        let fields = ParsedFields::new().with(Field::LocalSpeedtestJitter, 0.0);
        let record = normalize(ts(), [(Source::LocalSpeedTest, fields)]);
        assert!(!record.is_missing(Field::LocalSpeedtestJitter));
    }

    #[test]
    fn foreign_fields_are_rejected() {
        let fields = ParsedFields::new().with(Field::GatewayRttAvgMs, 99.0);
        let record = normalize(ts(), [(Source::LocalWanPing, fields)]);
        assert!(record.is_missing(Field::GatewayRttAvgMs));
    }

    #[test]
    fn first_writer_wins() {
        let first = ParsedFields::new().with(Field::LocalWanRttAvgMs, 10.0);
        let second = ParsedFields::new().with(Field::LocalWanRttAvgMs, 20.0);
        let record = normalize(
            ts(),
            [(Source::LocalWanPing, first), (Source::LocalWanPing, second)],
        );
        assert_eq!(record.number(Field::LocalWanRttAvgMs), Some(10.0));
    }

    #[test]
    fn derived_fields_cannot_be_injected() {
        let fields = ParsedFields::new().with(Field::DownloadBufferbloatMs, 1.0);
        let record = normalize(ts(), [(Source::Derived, fields)]);
        assert!(record.is_missing(Field::DownloadBufferbloatMs));
    }

    #[test]
    fn build_derives_bufferbloat() {
        let wan = ParsedFields::new().with(Field::LocalWanRttAvgMs, 20.0);
        let speed = ParsedFields::new()
            .with(Field::LocalLatencyDownLoadMs, 55.0)
            .with(Field::LocalLatencyUpLoadMs, 41.0);
        let record = normalize(
            ts(),
            [(Source::LocalWanPing, wan), (Source::LocalSpeedTest, speed)],
        );
        assert_eq!(record.number(Field::DownloadBufferbloatMs), Some(35.0));
        assert_eq!(record.number(Field::UploadBufferbloatMs), Some(21.0));
    }

    #[test]
    fn text_values_are_kept_verbatim() {
        let wifi = ParsedFields::new().with(Field::WifiChannel, "149,80");
        let record = normalize(ts(), [(Source::Wifi, wifi)]);
        assert_eq!(record.text(Field::WifiChannel), Some("149,80"));
        assert_eq!(record.number(Field::WifiChannel), None);
    }
}
