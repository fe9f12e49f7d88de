// Suite event contract - the two lifecycle signals a benchmark suite emits

use serde::Serialize;
use serde_json::Value;

/// Lifecycle signal emitted by a running benchmark suite.
#[derive(Debug, Clone)]
pub enum SuiteEvent {
    /// One benchmark item finished, successfully or not.
    ItemCompleted(ItemRecord),
    /// The whole suite finished. Carries nothing beyond suite identity.
    SuiteCompleted { name: String },
}

/// Timing statistics attached to a successfully measured item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStats {
    /// Raw timing samples, as supplied by the suite.
    pub sample: Vec<f64>,
    /// Relative margin of error, in percent.
    pub rme: f64,
    /// Operations per second.
    pub hz: f64,
}

/// Final state of one benchmark item: either a failure payload or stats,
/// never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// Opaque failure payload, carried verbatim into the report.
    Failed(Value),
    Measured(ItemStats),
}

/// Read-only snapshot of one completed benchmark item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub name: String,
    pub id: u64,
    pub outcome: ItemOutcome,
}

impl ItemRecord {
    /// Create a measured (successful) item record
    pub fn measured(name: impl Into<String>, id: u64, stats: ItemStats) -> Self {
        Self {
            name: name.into(),
            id,
            outcome: ItemOutcome::Measured(stats),
        }
    }

    /// Create a failed item record with an opaque error payload
    pub fn failed(name: impl Into<String>, id: u64, error: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            id,
            outcome: ItemOutcome::Failed(error.into()),
        }
    }

    /// Whether this item carries a failure payload
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Failed(_))
    }
}
