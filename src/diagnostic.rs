//! Diagnostic records attached to search results.
//!
//! Conditions that degrade a search without failing it (the iteration cap firing, a query with
//! no reachable root) are reported here instead of through `Err`, so that every well-formed query
//! returns a [`crate::paths::PathCollection`].

use serde::{Deserialize, Serialize};

use crate::config::LimitPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchDiagnostic {
    /// The search dequeued more than `limit` frontier entries and stopped.
    IterationLimit {
        limit: usize,
        /// Distinct nodes discovered before the search stopped
        visited: usize,
        /// Paths found before the search stopped
        paths_found: usize,
        policy: LimitPolicy,
    },

    /// A warning message about the search
    Warning(String),

    /// An informational message about the search
    Info(String),
}

impl SearchDiagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Info(message.into())
    }

    /// Whether the diagnostic should be surfaced to the user as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::IterationLimit { .. } | Self::Warning(_))
    }

    pub fn is_iteration_limit(&self) -> bool {
        matches!(self, Self::IterationLimit { .. })
    }
}

impl std::fmt::Display for SearchDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IterationLimit {
                limit,
                visited,
                paths_found,
                policy,
            } => {
                write!(
                    f,
                    "Warning: root path search exceeded {limit} iterations after visiting {visited} nodes"
                )?;
                match policy {
                    LimitPolicy::Discard => write!(f, "; discarded {paths_found} partial paths"),
                    LimitPolicy::KeepPartial => write!(f, "; kept {paths_found} partial paths"),
                }
            }
            Self::Warning(msg) => write!(f, "Warning: {msg}"),
            Self::Info(msg) => write!(f, "Info: {msg}"),
        }
    }
}
