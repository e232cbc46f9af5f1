use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModerationStatus;
use crate::common::MemberId;

/// How an item enters the lifecycle.
///
/// Staff-authored content skips review: it is created approved with the
/// author recorded as reviewer, so `reviewed_by`/`reviewed_at` are set
/// whenever the status is not pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Origin {
    Submitted { by: MemberId },
    StaffAuthored { by: MemberId },
}

impl Origin {
    pub fn author(&self) -> MemberId {
        match self {
            Origin::Submitted { by } | Origin::StaffAuthored { by } => *by,
        }
    }

    pub fn initial_status(&self) -> ModerationStatus {
        match self {
            Origin::Submitted { .. } => ModerationStatus::Pending,
            Origin::StaffAuthored { .. } => ModerationStatus::Approved,
        }
    }

    pub fn reviewed_by(&self) -> Option<MemberId> {
        match self {
            Origin::Submitted { .. } => None,
            Origin::StaffAuthored { by } => Some(*by),
        }
    }

    pub fn reviewed_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.reviewed_by().map(|_| now)
    }
}
