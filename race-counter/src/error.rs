use thiserror::Error;

use crate::variant::CounterVariant;

/// Failures surfaced by the harness.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    #[error("invalid harness config: {0}")]
    InvalidConfig(String),
    #[error("worker {worker} panicked while incrementing the {variant} counter")]
    WorkerPanicked {
        variant: CounterVariant,
        worker: usize,
    },
    #[error("failed to spawn worker {worker} for the {variant} counter: {reason}")]
    Spawn {
        variant: CounterVariant,
        worker: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
