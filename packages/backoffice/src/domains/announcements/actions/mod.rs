//! Announcement actions
//!
//! Publishing, audience changes and view counting. Every result that the UI
//! shows next to an announcement carries the recomputed recipient estimate.

use chrono::Utc;
use tracing::info;

use crate::common::{AnnouncementId, ModerationError, ModerationResult};
use crate::domains::audience::{AudienceDescriptor, Viewer};
use crate::domains::moderation::actions::write_lost;
use crate::domains::moderation::events::ModerationEvent;
use crate::domains::moderation::models::{store, Moderatable, ModerationStatus, Origin};
use crate::domains::moderation::ModerationOutcome;
use crate::kernel::BackofficeDeps;

use super::models::{Announcement, CreateAnnouncement};

/// Create an announcement and report how many members it would reach.
pub async fn create(
    input: CreateAnnouncement,
    origin: Origin,
    deps: &BackofficeDeps,
) -> ModerationResult<ModerationOutcome<Announcement>> {
    let estimated_recipients = deps.audience.estimate(&input.audience);
    info!(
        author = %origin.author(),
        target_type = %input.audience.target_type(),
        estimated_recipients,
        "Creating announcement"
    );

    let announcement = Announcement::create(input, origin, &deps.db_pool).await?;

    if let Some(sent_at) = announcement.sent_at {
        info!(id = %announcement.id, %sent_at, "Announcement published on creation");
        ModerationEvent::AnnouncementSent {
            item_id: announcement.id.into_uuid(),
            estimated_recipients,
        }
        .record();
    }

    Ok(ModerationOutcome {
        item: announcement,
        estimated_recipients: Some(estimated_recipients),
    })
}

/// Publish an approved announcement that has not gone out yet.
///
/// `sent_at` is written exactly once; sending again, or sending something
/// that is not approved, is an `InvalidTransition`.
pub async fn send(
    id: AnnouncementId,
    deps: &BackofficeDeps,
) -> ModerationResult<ModerationOutcome<Announcement>> {
    info!(id = %id, "Sending announcement");

    let current = store::find_live::<Announcement>(id, Utc::now(), &deps.db_pool).await?;
    if current.is_sent() {
        return Err(invalid_send(id, "already sent".to_string()));
    }
    if current.review.status != ModerationStatus::Approved {
        return Err(invalid_send(
            id,
            format!("only approved announcements can be sent (status: {})", current.review.status),
        ));
    }

    let sent = match Announcement::mark_sent(id, &deps.db_pool).await? {
        Some(sent) => sent,
        None => return Err(write_lost::<Announcement>(id, "send", &deps.db_pool).await),
    };

    let estimated_recipients = deps.audience.estimate(&sent.audience);
    ModerationEvent::AnnouncementSent {
        item_id: id.into_uuid(),
        estimated_recipients,
    }
    .record();

    Ok(ModerationOutcome {
        item: sent,
        estimated_recipients: Some(estimated_recipients),
    })
}

/// Count a view. Viewers outside the audience, and announcements that are
/// not live for them, get `NotFound`: they cannot see it at all.
pub async fn record_view(
    id: AnnouncementId,
    viewer: &Viewer,
    deps: &BackofficeDeps,
) -> ModerationResult<i64> {
    let now = Utc::now();
    // Settle archival state first so an expired row is never counted.
    store::find_live::<Announcement>(id, now, &deps.db_pool).await?;

    let count = Announcement::increment_views(id, viewer, now, &deps.db_pool)
        .await?
        .ok_or_else(|| store::not_found::<Announcement>(id))?;

    info!(id = %id, viewer = %viewer.member_id, view_count = count, "Announcement viewed");
    Ok(count)
}

/// Replace the audience of an announcement that has not been sent.
pub async fn retarget(
    id: AnnouncementId,
    audience: AudienceDescriptor,
    deps: &BackofficeDeps,
) -> ModerationResult<ModerationOutcome<Announcement>> {
    audience.validate()?;

    let current = store::find_live::<Announcement>(id, Utc::now(), &deps.db_pool).await?;
    if current.is_sent() {
        return Err(ModerationError::InvalidTransition {
            kind: Announcement::KIND.label(),
            id: id.into_uuid(),
            action: "retarget",
            reason: "already sent".to_string(),
        });
    }

    let updated = match Announcement::update_audience(id, &audience, &deps.db_pool).await? {
        Some(updated) => updated,
        None => return Err(write_lost::<Announcement>(id, "retarget", &deps.db_pool).await),
    };

    let estimated_recipients = deps.audience.estimate(&updated.audience);
    ModerationEvent::AnnouncementRetargeted {
        item_id: id.into_uuid(),
        estimated_recipients,
    }
    .record();

    Ok(ModerationOutcome {
        item: updated,
        estimated_recipients: Some(estimated_recipients),
    })
}

fn invalid_send(id: AnnouncementId, reason: String) -> ModerationError {
    ModerationError::InvalidTransition {
        kind: Announcement::KIND.label(),
        id: id.into_uuid(),
        action: "send",
        reason,
    }
}
