//! Moderation state machine
//!
//! Pure decision logic - NO IO, only state transitions. Actions consult the
//! machine before writing, and build the `WHERE status = ..` guard of their
//! conditional UPDATE from `Transition::required_status`, so the in-memory
//! check and the store-side check cannot disagree.

use serde::{Deserialize, Serialize};

use crate::domains::moderation::models::ModerationStatus;

/// A requested lifecycle change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Approve,
    Reject,
    /// Explicit admin archive.
    Archive,
    /// Archive derived from an elapsed `archive_at`, applied on read.
    AutoArchive,
}

impl Transition {
    pub fn action(&self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Archive => "archive",
            Transition::AutoArchive => "auto-archive",
        }
    }

    /// The only status this transition may start from.
    pub fn required_status(&self) -> ModerationStatus {
        match self {
            Transition::Approve | Transition::Reject => ModerationStatus::Pending,
            Transition::Archive | Transition::AutoArchive => ModerationStatus::Approved,
        }
    }

    pub fn target_status(&self) -> ModerationStatus {
        match self {
            Transition::Approve => ModerationStatus::Approved,
            Transition::Reject => ModerationStatus::Rejected,
            Transition::Archive | Transition::AutoArchive => ModerationStatus::Archived,
        }
    }
}

/// What the machine allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Write `from -> to`.
    Apply {
        from: ModerationStatus,
        to: ModerationStatus,
    },
    /// Nothing to write; the item is already where the transition leads.
    /// Only the automatic archive path ends up here.
    AlreadyApplied,
}

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refusal {
    pub current: ModerationStatus,
    pub transition: Transition,
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ModerationStatus::*;

        match (self.transition, self.current) {
            (Transition::Approve, Approved) => f.write_str("already approved"),
            (Transition::Reject, Rejected) => f.write_str("already rejected"),
            (Transition::Archive | Transition::AutoArchive, Archived) => {
                f.write_str("already archived")
            }
            (Transition::Approve | Transition::Reject, _) => {
                write!(f, "only pending items can be reviewed (status: {})", self.current)
            }
            (Transition::Archive | Transition::AutoArchive, _) => write!(
                f,
                "only approved items can be archived (status: {})",
                self.current
            ),
        }
    }
}

/// The moderation lifecycle: pending -> approved | rejected, approved -> archived.
pub struct ModerationMachine;

impl ModerationMachine {
    pub fn decide(current: ModerationStatus, transition: Transition) -> Result<Decision, Refusal> {
        if current == transition.required_status() {
            return Ok(Decision::Apply {
                from: current,
                to: transition.target_status(),
            });
        }

        // Automatic archival is re-evaluated on every read and must be safe to
        // repeat; a deliberate admin archive of an archived item is not.
        if transition == Transition::AutoArchive && current == ModerationStatus::Archived {
            return Ok(Decision::AlreadyApplied);
        }

        Err(Refusal {
            current,
            transition,
        })
    }
}
