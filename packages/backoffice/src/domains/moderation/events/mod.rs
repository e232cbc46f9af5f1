//! Moderation audit events
//!
//! Immutable facts about lifecycle changes. They are recorded on the `audit`
//! tracing target so every transition, including the silent ones (lazy
//! archival, repeated deletes), leaves a trail.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::common::MemberId;
use crate::domains::moderation::models::ContentKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModerationEvent {
    Approved {
        kind: ContentKind,
        item_id: Uuid,
        reviewed_by: MemberId,
    },
    Rejected {
        kind: ContentKind,
        item_id: Uuid,
        reviewed_by: MemberId,
        reason: String,
    },
    Archived {
        kind: ContentKind,
        item_id: Uuid,
    },
    /// Archived on read because `archive_at` had passed.
    AutoArchived {
        kind: ContentKind,
        item_id: Uuid,
    },
    /// Bulk read-triggered or forced reconciliation.
    ExpiredReconciled {
        kind: ContentKind,
        archived: u64,
    },
    Deleted {
        kind: ContentKind,
        item_id: Uuid,
    },
    /// Delete requested for an item that was already deleted.
    DeleteIgnored {
        kind: ContentKind,
        item_id: Uuid,
    },
    AnnouncementSent {
        item_id: Uuid,
        estimated_recipients: i64,
    },
    AnnouncementRetargeted {
        item_id: Uuid,
        estimated_recipients: i64,
    },
    /// A conditional update lost a race with another writer.
    WriteLost {
        kind: ContentKind,
        item_id: Uuid,
        action: String,
    },
}

impl ModerationEvent {
    pub fn record(&self) {
        match self {
            ModerationEvent::WriteLost { .. } => warn!(target: "audit", event = ?self),
            _ => info!(target: "audit", event = ?self),
        }
    }
}
