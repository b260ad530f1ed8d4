use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selects which counter implementation a demonstration run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterVariant {
    /// Separate load and store. Concurrent increments can be lost.
    Unprotected,
    /// Read-modify-write under an exclusive lock.
    Locked,
    /// Single fetch-and-add.
    Atomic,
}

impl CounterVariant {
    /// Every variant, in demonstration order.
    pub const ALL: [CounterVariant; 3] = [
        CounterVariant::Unprotected,
        CounterVariant::Locked,
        CounterVariant::Atomic,
    ];

    /// Human-readable label used in the console report.
    pub const fn label(self) -> &'static str {
        match self {
            CounterVariant::Unprotected => "Unsafe Counter",
            CounterVariant::Locked => "Safe Counter (Mutex)",
            CounterVariant::Atomic => "Safe Counter (Atomic)",
        }
    }

    /// Whether a run of this variant always reaches the expected total.
    pub const fn is_synchronized(self) -> bool {
        !matches!(self, CounterVariant::Unprotected)
    }

    /// Lowercase name used by `Display`, `FromStr` and serde.
    pub const fn name(self) -> &'static str {
        match self {
            CounterVariant::Unprotected => "unprotected",
            CounterVariant::Locked => "locked",
            CounterVariant::Atomic => "atomic",
        }
    }
}

impl fmt::Display for CounterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown counter variant `{0}` (expected unprotected, locked or atomic)")]
pub struct ParseVariantError(String);

impl FromStr for CounterVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unprotected" | "unsafe" => Ok(CounterVariant::Unprotected),
            "locked" | "mutex" => Ok(CounterVariant::Locked),
            "atomic" => Ok(CounterVariant::Atomic),
            _ => Err(ParseVariantError(s.to_owned())),
        }
    }
}
