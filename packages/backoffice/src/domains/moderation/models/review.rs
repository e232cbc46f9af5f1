use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModerationStatus;
use crate::common::MemberId;
use crate::domains::archival;

/// Lifecycle columns shared by every moderatable table, flattened into each
/// concrete record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewState {
    pub status: ModerationStatus,
    pub submitted_by: MemberId,
    pub reviewed_by: Option<MemberId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub archive_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewState {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the derived archival deadline has passed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        archival::is_expired(self.archive_at, now)
    }

    /// Whether a read at `now` should move this item to `archived`.
    pub fn needs_auto_archive(&self, now: DateTime<Utc>) -> bool {
        self.status == ModerationStatus::Approved && !self.is_deleted() && self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn review(status: ModerationStatus, archive_at: Option<DateTime<Utc>>) -> ReviewState {
        let now = Utc::now();
        ReviewState {
            status,
            submitted_by: MemberId::new(),
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            archive_at,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_approved_expired_items_need_archiving() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));

        assert!(review(ModerationStatus::Approved, past).needs_auto_archive(now));
        assert!(!review(ModerationStatus::Pending, past).needs_auto_archive(now));
        assert!(!review(ModerationStatus::Archived, past).needs_auto_archive(now));
        assert!(!review(ModerationStatus::Approved, None).needs_auto_archive(now));
        assert!(!review(ModerationStatus::Approved, Some(now + Duration::hours(1)))
            .needs_auto_archive(now));
    }

    #[test]
    fn deleted_items_are_left_alone() {
        let now = Utc::now();
        let mut state = review(ModerationStatus::Approved, Some(now - Duration::days(1)));
        state.deleted_at = Some(now);
        assert!(!state.needs_auto_archive(now));
    }
}
