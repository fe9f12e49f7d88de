// Collector - ordered accumulation of suite results and the event loop
// binding the two suite signals to report construction

use crate::config::ReporterConfig;
use crate::error::ReporterError;
use crate::report;
use crate::sink::{FileSink, Sink};
use crate::suite::{ItemRecord, SuiteEvent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Accumulates per-item results in emission order and, on suite completion,
/// builds the report and hands it to the sink exactly once.
pub struct Collector {
    config: ReporterConfig,
    sink: Box<dyn Sink>,
    items: Vec<ItemRecord>,
    finalized: bool,
}

impl Collector {
    /// Collector writing through the default file sink
    pub fn new(config: ReporterConfig) -> Self {
        Self::with_sink(config, Box::new(FileSink))
    }

    /// Collector writing through a caller-supplied sink
    pub fn with_sink(config: ReporterConfig, sink: Box<dyn Sink>) -> Self {
        Self {
            config,
            sink,
            items: Vec::new(),
            finalized: false,
        }
    }

    /// Handle an item-completed signal: append the snapshot in arrival
    /// order. No transformation, no deduplication. Items arriving after
    /// suite completion are ignored.
    pub fn record(&mut self, item: ItemRecord) {
        if self.finalized {
            warn!(item = %item.name, "ignoring item completed after suite completion");
            return;
        }
        debug!(item = %item.name, id = item.id, "recorded benchmark item");
        self.items.push(item);
    }

    /// Accumulated items, in emission order.
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    /// Whether the suite-completed signal was already handled.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Handle the suite-completed signal: build the report (probing the host
    /// when fingerprinting is enabled) and invoke the sink once.
    ///
    /// A second completion returns [`ReporterError::SuiteAlreadyCompleted`];
    /// the report is never rebuilt or re-persisted. A sink failure is fatal
    /// to this suite's reporting, with no retry.
    pub async fn complete(&mut self, suite_name: &str) -> Result<(), ReporterError> {
        if self.finalized {
            return Err(ReporterError::SuiteAlreadyCompleted(suite_name.to_string()));
        }
        self.finalized = true;

        let report = report::build_report(&self.items, suite_name, &self.config).await;
        self.sink
            .persist(&report, &self.config.folder)
            .map_err(|source| ReporterError::Persist {
                suite: suite_name.to_string(),
                source,
            })
    }
}

/// Drain a suite's event stream into a collector, using the default file
/// sink. Runs until the suite drops its sender.
pub async fn observe(
    events: mpsc::Receiver<SuiteEvent>,
    config: ReporterConfig,
) -> Result<(), ReporterError> {
    let sink: Box<dyn Sink> = Box::new(FileSink);
    observe_with(events, config, sink).await
}

/// [`observe`] with a caller-supplied sink.
///
/// Duplicate completion signals are logged and ignored here rather than
/// surfaced: a suite that double-fires should not poison the stream.
pub async fn observe_with(
    mut events: mpsc::Receiver<SuiteEvent>,
    config: ReporterConfig,
    sink: Box<dyn Sink>,
) -> Result<(), ReporterError> {
    let mut collector = Collector::with_sink(config, sink);

    while let Some(event) = events.recv().await {
        match event {
            SuiteEvent::ItemCompleted(item) => collector.record(item),
            SuiteEvent::SuiteCompleted { name } => match collector.complete(&name).await {
                Ok(()) => {}
                Err(ReporterError::SuiteAlreadyCompleted(name)) => {
                    warn!(suite = %name, "ignoring duplicate suite completion");
                }
                Err(err) => return Err(err),
            },
        }
    }

    Ok(())
}
