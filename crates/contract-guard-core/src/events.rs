use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::guard::{GuardStatus, GuardTier};

/// Every change in a running guard produces an Event.
/// Status sinks receive them in order; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GuardEvent {
    GuardStarted {
        due_at: DateTime<Utc>,
        grace_days: u32,
        poll_interval_ms: u64,
        at: DateTime<Utc>,
    },
    /// A fresh status replaced the previous snapshot.
    StatusEvaluated {
        status: GuardStatus,
    },
    /// Severity moved. `from` is `None` for the first evaluation.
    TierChanged {
        from: Option<GuardTier>,
        to: GuardTier,
        at: DateTime<Utc>,
    },
    GuardStopped {
        at: DateTime<Utc>,
    },
}

impl GuardEvent {
    pub fn status(&self) -> Option<&GuardStatus> {
        match self {
            GuardEvent::StatusEvaluated { status } => Some(status),
            _ => None,
        }
    }
}
