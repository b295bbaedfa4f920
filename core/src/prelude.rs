use serde::{Deserialize, Serialize};

/// The three feature-measurement kinds that can be defining for a location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DefiningType {
    ArrivalTime,
    Azimuth,
    Slowness,
}

impl DefiningType {
    pub const ALL: [DefiningType; 3] = [
        DefiningType::ArrivalTime,
        DefiningType::Azimuth,
        DefiningType::Slowness,
    ];
}

/// Row-level change flag for one defining field, derived from the pending
/// override and the original defining state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DefiningChange {
    #[default]
    NoChange,
    ChangedToTrue,
    ChangedToFalse,
}

impl DefiningChange {
    /// Applies this change on top of the original defining flag.
    pub fn reconcile(self, original: bool) -> bool {
        match self {
            DefiningChange::ChangedToTrue => true,
            DefiningChange::ChangedToFalse => false,
            DefiningChange::NoChange => original,
        }
    }

    /// Derives the change flag from a pending override. An override equal to
    /// the original value reads as no change.
    pub fn from_override(original: bool, pending: Option<bool>) -> Self {
        match pending {
            None => DefiningChange::NoChange,
            Some(value) if value == original => DefiningChange::NoChange,
            Some(true) => DefiningChange::ChangedToTrue,
            Some(false) => DefiningChange::ChangedToFalse,
        }
    }
}

/// Common error type for engine operations on structurally invalid input.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("missing location solution: {0}")]
    MissingSolution(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
