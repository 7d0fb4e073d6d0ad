//! Bufferbloat: how much latency rises while the link is saturated.
//!
//! `delta = latency_under_load - idle_baseline`. The idle baseline is the
//! local WAN ping average, falling back to the local gateway ping average.
//! If either side is missing the delta is missing; a zero is never invented.

use crate::field::Field;
use crate::record::MetricRecord;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bufferbloat {
    pub download_ms: Option<f64>,
    pub upload_ms: Option<f64>,
}

impl Bufferbloat {
    pub fn compute(
        idle_baseline_ms: Option<f64>,
        download_load_ms: Option<f64>,
        upload_load_ms: Option<f64>,
    ) -> Self {
        Self {
            download_ms: delta(idle_baseline_ms, download_load_ms),
            upload_ms: delta(idle_baseline_ms, upload_load_ms),
        }
    }

    pub fn from_record(record: &MetricRecord) -> Self {
        let baseline = idle_baseline(
            record.number(Field::LocalWanRttAvgMs),
            record.number(Field::LocalGwRttAvgMs),
        );
        Self::compute(
            baseline,
            record.number(Field::LocalLatencyDownLoadMs),
            record.number(Field::LocalLatencyUpLoadMs),
        )
    }
}

pub fn idle_baseline(wan_rtt_ms: Option<f64>, gateway_rtt_ms: Option<f64>) -> Option<f64> {
    wan_rtt_ms.or(gateway_rtt_ms)
}

pub fn delta(idle_ms: Option<f64>, loaded_ms: Option<f64>) -> Option<f64> {
    Some(loaded_ms? - idle_ms?)
}
