use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::common::error::{ModerationError, ModerationResult};
use crate::domains::moderation::models::ContentKind;

/// Offsets from domain date to archive deadline, per content kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivalPolicy {
    /// Days after the funeral date a death notice stays up.
    pub death_notice_days: i64,
}

impl Default for ArchivalPolicy {
    fn default() -> Self {
        Self {
            death_notice_days: 7,
        }
    }
}

impl ArchivalPolicy {
    /// Rejects offsets that are not positive or not representable.
    pub fn validate(&self) -> ModerationResult<()> {
        if self.death_notice_days < 1 || Duration::try_days(self.death_notice_days).is_none() {
            return Err(ModerationError::validation(format!(
                "death notice archive offset must be a positive number of days (got {})",
                self.death_notice_days
            )));
        }
        Ok(())
    }

    /// The fixed offset for `kind`, or `None` if the kind never auto-archives.
    pub fn offset_for(&self, kind: ContentKind) -> ModerationResult<Option<Duration>> {
        match kind {
            ContentKind::DeathNotice => Duration::try_days(self.death_notice_days)
                .map(Some)
                .ok_or_else(|| {
                    ModerationError::validation(format!(
                        "death notice archive offset of {} days is out of range",
                        self.death_notice_days
                    ))
                }),
            ContentKind::Ad | ContentKind::Campaign | ContentKind::Announcement => Ok(None),
        }
    }

    /// `archive_at` for an item of `kind` with the given domain date.
    pub fn archive_at(
        &self,
        kind: ContentKind,
        domain_date: NaiveDate,
    ) -> ModerationResult<Option<DateTime<Utc>>> {
        self.offset_for(kind)?
            .map(|offset| compute_archive_at(domain_date, offset))
            .transpose()
    }
}

/// Start of `domain_date` (UTC) plus `offset`. Deadlines past the end of the
/// calendar are a validation error.
pub fn compute_archive_at(
    domain_date: NaiveDate,
    offset: Duration,
) -> ModerationResult<DateTime<Utc>> {
    domain_date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .checked_add_signed(offset)
        .ok_or_else(|| {
            ModerationError::validation(format!(
                "archive deadline for {} is out of range",
                domain_date
            ))
        })
}

/// True once `now` has reached the deadline. Items without a deadline never expire.
pub fn is_expired(archive_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    archive_at.is_some_and(|deadline| now >= deadline)
}
