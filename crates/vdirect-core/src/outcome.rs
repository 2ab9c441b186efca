// ── Operation outcome ──

use serde::Serialize;
use serde_json::{Map, Value};

use crate::execution::{Completed, Finished};

/// Result record of every operation: whether anything changed on the
/// service, plus whatever facts, log and timing the service returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facts: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Parameter description returned by describe mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    /// `Some(false)` when an accepted operation was not awaited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl Outcome {
    pub fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn with_changed(changed: bool) -> Self {
        Self {
            changed,
            ..Self::default()
        }
    }

    pub fn described(usage: Value) -> Self {
        Self {
            usage: Some(usage),
            ..Self::default()
        }
    }

    /// Attach facts, dropping an empty map.
    pub fn with_facts(mut self, facts: Map<String, Value>) -> Self {
        self.facts = (!facts.is_empty()).then_some(facts);
        self
    }
}

impl From<Finished> for Outcome {
    fn from(finished: Finished) -> Self {
        match finished {
            Finished::Immediate(_) => Self::changed(),
            Finished::Completed(Completed {
                messages, duration, ..
            }) => Self {
                changed: true,
                log: messages,
                duration,
                complete: Some(true),
                ..Self::default()
            },
            Finished::Pending => Self {
                changed: true,
                complete: Some(false),
                ..Self::default()
            },
        }
    }
}
