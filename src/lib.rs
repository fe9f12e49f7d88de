pub mod collector;
pub mod config;
pub mod error;
pub mod report;
pub mod sink;
pub mod suite;

pub use collector::{Collector, observe, observe_with};
pub use config::ReporterConfig;
pub use error::ReporterError;
pub use report::{ReportEntry, RunReport, SystemFingerprint};
pub use sink::{FileSink, Sink};
pub use suite::{ItemOutcome, ItemRecord, ItemStats, SuiteEvent};
