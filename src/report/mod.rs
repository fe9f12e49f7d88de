// Report module - turns accumulated suite results into a persistable report

pub mod fingerprint;

pub use fingerprint::{SystemFingerprint, UNKNOWN};

use crate::config::ReporterConfig;
use crate::suite::{ItemOutcome, ItemRecord, ItemStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Rates at or above this many operations per second are reported as whole
/// numbers; slower rates keep two decimal places.
const OPS_WHOLE_NUMBER_THRESHOLD: f64 = 100.0;

/// One benchmark item as it appears in the persisted report.
///
/// A genuine two-variant shape: an entry either carries the failure payload
/// or the measurement fields, never a mix of optional leftovers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Failure {
        name: String,
        id: u64,
        error: Value,
    },
    Success {
        name: String,
        id: u64,
        stats: ItemStats,
        samples: usize,
        deviation: String,
        ops: String,
    },
}

impl ReportEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Failure { name, .. } | Self::Success { name, .. } => name,
        }
    }
}

/// The assembled report for one suite run, handed to the sink exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Suite name; part of the file naming convention, not of the JSON body.
    #[serde(skip)]
    pub suite: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sysinfo: Option<SystemFingerprint>,

    /// Entries in suite emission order.
    pub benchmarks: Vec<ReportEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Content hash of `sysinfo`; part of the file naming convention.
    #[serde(skip)]
    pub host_hash: Option<String>,
}

/// Format a relative margin of error with exactly 2 decimal places.
pub fn format_deviation(rme: f64) -> String {
    format!("{:.2}", round_to(rme, 2))
}

/// Format an operations-per-second rate: 2 decimal places below the
/// whole-number threshold, 0 at or above it.
pub fn format_ops(hz: f64) -> String {
    if hz < OPS_WHOLE_NUMBER_THRESHOLD {
        format!("{:.2}", round_to(hz, 2))
    } else {
        format!("{:.0}", hz.round())
    }
}

// Round half away from zero at the scaled value, so 0.015 -> 0.02.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn build_entry(item: &ItemRecord) -> ReportEntry {
    // Branch on the failure payload, not on missing stats.
    match &item.outcome {
        ItemOutcome::Failed(error) => ReportEntry::Failure {
            name: item.name.clone(),
            id: item.id,
            error: error.clone(),
        },
        ItemOutcome::Measured(stats) => ReportEntry::Success {
            name: item.name.clone(),
            id: item.id,
            samples: stats.sample.len(),
            deviation: format_deviation(stats.rme),
            ops: format_ops(stats.hz),
            stats: stats.clone(),
        },
    }
}

/// Map raw item records into report entries, preserving emission order.
pub fn build_entries(items: &[ItemRecord]) -> Vec<ReportEntry> {
    items.iter().map(build_entry).collect()
}

/// Assemble the report for a completed suite. When fingerprinting is enabled
/// the host is probed (three concurrent queries, joined) and the report is
/// stamped with the capture time.
pub async fn build_report(
    items: &[ItemRecord],
    suite_name: &str,
    config: &ReporterConfig,
) -> RunReport {
    let benchmarks = build_entries(items);
    debug!(
        suite = suite_name,
        entries = benchmarks.len(),
        fingerprint = config.fingerprint,
        "assembled report"
    );

    if config.fingerprint {
        let sysinfo = fingerprint::probe().await;
        let host_hash = sysinfo.content_hash();
        RunReport {
            suite: suite_name.to_string(),
            sysinfo: Some(sysinfo),
            benchmarks,
            timestamp: Some(Utc::now()),
            host_hash: Some(host_hash),
        }
    } else {
        RunReport {
            suite: suite_name.to_string(),
            sysinfo: None,
            benchmarks,
            timestamp: None,
            host_hash: None,
        }
    }
}
