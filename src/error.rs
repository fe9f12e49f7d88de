// Reporter error taxonomy

use thiserror::Error;

/// Errors surfaced by the reporting pipeline.
///
/// Item-level benchmark failures are not errors here: they are data, carried
/// verbatim in the report's `error` field. Host-probe failures are degraded
/// to an all-unknown fingerprint and never surface through this type.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// The suite already emitted its completion signal; the report was built
    /// and persisted once and will not be rebuilt.
    #[error("suite {0:?} already completed; report was already persisted")]
    SuiteAlreadyCompleted(String),

    /// The sink failed to persist the report. Fatal to this suite's
    /// reporting; no retry is attempted.
    #[error("failed to persist report for suite {suite:?}")]
    Persist {
        suite: String,
        #[source]
        source: anyhow::Error,
    },
}
