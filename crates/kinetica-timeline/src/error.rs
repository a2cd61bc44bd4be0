use thiserror::Error;

use crate::step::StepId;

/// Why a proposed step order is not a permutation of the current steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    #[error("expected {expected} ids, got {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("step `{0}` appears more than once")]
    Duplicate(StepId),

    #[error("step `{0}` is not part of this timeline")]
    Unknown(StepId),
}

/// Errors returned by timeline edits.
///
/// A failed edit never leaves the timeline partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// No step with this id exists.
    #[error("unknown step `{0}`")]
    UnknownStep(StepId),

    /// The name does not match any animatable property.
    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    /// Removing the step would leave the timeline empty.
    #[error("a timeline must keep at least one step")]
    LastStep,

    #[error("invalid step order: {0}")]
    InvalidPermutation(#[from] PermutationError),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
