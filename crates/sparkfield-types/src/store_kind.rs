//! Storage strategy selector.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which particle store strategy backs a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// One heap allocation per record, links embedded in the node.
    Heap,
    /// Arena with free and live chains; removed records are recycled.
    Pooled,
    /// Versioned-key container with stable handles.
    HandleList,
}

impl StoreKind {
    /// All strategies, in benchmark order.
    pub const ALL: [Self; 3] = [Self::Heap, Self::Pooled, Self::HandleList];

    /// Stable snake-case name used in config files and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heap => "heap",
            Self::Pooled => "pooled",
            Self::HandleList => "handle_list",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known store strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown store kind: {0}")]
pub struct ParseStoreKindError(pub String);

impl FromStr for StoreKind {
    type Err = ParseStoreKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heap" => Ok(Self::Heap),
            "pooled" | "pool" => Ok(Self::Pooled),
            "handle_list" | "handle-list" | "list" => Ok(Self::HandleList),
            other => Err(ParseStoreKindError(other.to_owned())),
        }
    }
}
