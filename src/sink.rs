// Persistence sink - durable append-only storage for assembled reports

use crate::report::RunReport;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Destination for assembled reports.
///
/// Invoked exactly once per suite completion. Implementations own
/// persistence entirely; the pipeline discards the report afterwards.
pub trait Sink: Send + Sync {
    fn persist(&self, report: &RunReport, folder: &Path) -> Result<()>;
}

/// Default sink: appends one line of JSON per suite run to a file named
/// after the suite (plain variant) or after the suite and host hash
/// (fingerprint variant). Multiple runs accumulate lines in the same file.
#[derive(Debug, Default)]
pub struct FileSink;

impl FileSink {
    fn file_name(report: &RunReport) -> String {
        match &report.host_hash {
            Some(hash) => format!("{}-({}).log", report.suite, hash),
            None => format!("{}.json", report.suite),
        }
    }

    fn render_line(report: &RunReport) -> Result<String> {
        // Plain variant persists the bare entry array; the fingerprint
        // variant wraps it with sysinfo and the capture timestamp.
        let line = if report.sysinfo.is_some() {
            serde_json::to_string(report)
        } else {
            serde_json::to_string(&report.benchmarks)
        };
        line.context("Failed to serialize report to JSON")
    }
}

impl Sink for FileSink {
    fn persist(&self, report: &RunReport, folder: &Path) -> Result<()> {
        std::fs::create_dir_all(folder)
            .with_context(|| format!("Failed to create report folder: {}", folder.display()))?;

        let path = folder.join(Self::file_name(report));
        let line = Self::render_line(report)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open report file: {}", path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to append report to: {}", path.display()))?;

        debug!(file = %path.display(), "appended report line");
        Ok(())
    }
}
