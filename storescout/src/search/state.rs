//! Search controller states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of a search controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchState {
    /// No search has been started.
    #[default]
    Idle,
    /// Pages are being requested.
    Running,
    /// The run ended without error.
    Completed {
        /// The service still had pages when the run stopped at its page limit.
        more_available: bool,
    },
    /// The consumer stopped the run.
    Cancelled,
    /// A page request failed.
    Failed,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed {
                more_available: true,
            } => write!(f, "completed (more available)"),
            Self::Completed {
                more_available: false,
            } => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl SearchState {
    /// Returns true if no run is in progress and one has been started before.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Cancelled | Self::Failed
        )
    }

    /// Returns true if `load_more` may resume from this state.
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        matches!(
            self,
            Self::Completed {
                more_available: true
            } | Self::Cancelled
        )
    }
}
