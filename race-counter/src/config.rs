use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Workers spawned per demonstration run.
pub const DEFAULT_WORKERS: usize = 2;

/// Increments each worker performs.
pub const DEFAULT_INCREMENTS_PER_WORKER: u64 = 1000;

/// Load applied to a counter during one run.
///
/// Missing fields fall back to the defaults, so `{}` deserializes to
/// two workers of 1000 increments each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub workers: usize,
    pub increments_per_worker: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            increments_per_worker: DEFAULT_INCREMENTS_PER_WORKER,
        }
    }
}

impl HarnessConfig {
    pub fn new(workers: usize, increments_per_worker: u64) -> Self {
        Self {
            workers,
            increments_per_worker,
        }
    }

    /// The value a synchronized counter holds after every worker is joined.
    ///
    /// `None` if the product does not fit in a `u64`.
    pub fn expected_total(&self) -> Option<u64> {
        u64::try_from(self.workers)
            .ok()?
            .checked_mul(self.increments_per_worker)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(HarnessError::InvalidConfig(
                "at least one worker is required".into(),
            ));
        }
        if self.increments_per_worker == 0 {
            return Err(HarnessError::InvalidConfig(
                "workers must perform at least one increment".into(),
            ));
        }
        if self.expected_total().is_none() {
            return Err(HarnessError::InvalidConfig(format!(
                "{} workers x {} increments overflows the counter",
                self.workers, self.increments_per_worker
            )));
        }
        Ok(())
    }
}
