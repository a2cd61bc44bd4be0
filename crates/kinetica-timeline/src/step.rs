use std::fmt;

use crate::property::PropertySet;

/// Identifier of a step, unique within its timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One point in a keyframe sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeStep {
    pub id: StepId,
    /// Ordering label assigned at creation (`previous + 1`). Not a duration.
    pub time: f32,
    pub properties: PropertySet,
}

impl KeyframeStep {
    pub fn new(id: StepId, time: f32, properties: PropertySet) -> Self {
        Self { id, time, properties }
    }
}
