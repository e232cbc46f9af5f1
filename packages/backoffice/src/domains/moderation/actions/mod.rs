//! Moderation actions - entry points for lifecycle transitions
//!
//! Each action validates its input, reads the item through `find_live`
//! (which applies lazy archival), asks the state machine whether the
//! transition is legal, then writes with a conditional UPDATE. Role checks
//! have already happened upstream.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::common::{Id, MemberId, ModerationError, ModerationResult};
use crate::domains::moderation::events::ModerationEvent;
use crate::domains::moderation::machines::{Decision, ModerationMachine, Transition};
use crate::domains::moderation::models::{
    store, ContentKind, Moderatable, ModerationStatus, RejectionReason,
};
use crate::kernel::BackofficeDeps;

/// Result of a transition: the updated item and, for targeted kinds, the
/// recomputed recipient estimate for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationOutcome<M> {
    pub item: M,
    pub estimated_recipients: Option<i64>,
}

impl<M: Moderatable> ModerationOutcome<M> {
    fn new(item: M, deps: &BackofficeDeps) -> Self {
        let estimated_recipients = item.audience().map(|a| deps.audience.estimate(a));
        Self {
            item,
            estimated_recipients,
        }
    }
}

/// Approve a pending item.
pub async fn approve<M: Moderatable>(
    id: Id<M::Entity>,
    reviewer: MemberId,
    deps: &BackofficeDeps,
) -> ModerationResult<ModerationOutcome<M>> {
    info!(kind = %M::KIND, id = %id, reviewer = %reviewer, "Approving item");

    let current = store::find_live::<M>(id, Utc::now(), &deps.db_pool).await?;
    let from = require_apply::<M>(&current, Transition::Approve)?;

    let approved = match store::mark_approved::<M>(id, from, reviewer, &deps.db_pool).await? {
        Some(approved) => approved,
        None => {
            let action = Transition::Approve.action();
            return Err(write_lost::<M>(id, action, &deps.db_pool).await);
        }
    };

    ModerationEvent::Approved {
        kind: M::KIND,
        item_id: id.into_uuid(),
        reviewed_by: reviewer,
    }
    .record();

    Ok(ModerationOutcome::new(approved, deps))
}

/// Reject a pending item with a reason.
pub async fn reject<M: Moderatable>(
    id: Id<M::Entity>,
    reviewer: MemberId,
    reason: impl Into<RejectionReason>,
    deps: &BackofficeDeps,
) -> ModerationResult<ModerationOutcome<M>> {
    let reason = reason.into().into_text()?;

    info!(kind = %M::KIND, id = %id, reviewer = %reviewer, reason = %reason, "Rejecting item");

    let current = store::find_live::<M>(id, Utc::now(), &deps.db_pool).await?;
    let from = require_apply::<M>(&current, Transition::Reject)?;

    let rejected = match store::mark_rejected::<M>(id, from, reviewer, &reason, &deps.db_pool).await? {
        Some(rejected) => rejected,
        None => {
            let action = Transition::Reject.action();
            return Err(write_lost::<M>(id, action, &deps.db_pool).await);
        }
    };

    ModerationEvent::Rejected {
        kind: M::KIND,
        item_id: id.into_uuid(),
        reviewed_by: reviewer,
        reason,
    }
    .record();

    Ok(ModerationOutcome::new(rejected, deps))
}

/// Archive an approved item on an admin's request.
///
/// Archiving an item that is already archived is an error here, including
/// one that was archived automatically by the read that precedes the write.
pub async fn archive<M: Moderatable>(
    id: Id<M::Entity>,
    deps: &BackofficeDeps,
) -> ModerationResult<ModerationOutcome<M>> {
    info!(kind = %M::KIND, id = %id, "Archiving item");

    let current = store::find_live::<M>(id, Utc::now(), &deps.db_pool).await?;
    let from = require_apply::<M>(&current, Transition::Archive)?;

    let archived = match store::mark_archived::<M>(id, from, &deps.db_pool).await? {
        Some(archived) => archived,
        None => {
            let action = Transition::Archive.action();
            return Err(write_lost::<M>(id, action, &deps.db_pool).await);
        }
    };

    ModerationEvent::Archived {
        kind: M::KIND,
        item_id: id.into_uuid(),
    }
    .record();

    Ok(ModerationOutcome::new(archived, deps))
}

/// Soft-delete an item from any status.
///
/// Deleting an item that is already deleted succeeds without writing; an id
/// that never existed is `NotFound`.
pub async fn delete<M: Moderatable>(id: Id<M::Entity>, deps: &BackofficeDeps) -> ModerationResult<()> {
    info!(kind = %M::KIND, id = %id, "Deleting item");

    let current = store::find_by_id::<M>(id, &deps.db_pool)
        .await?
        .ok_or_else(|| store::not_found::<M>(id))?;

    let deleted = if current.review().is_deleted() {
        None
    } else {
        store::mark_deleted::<M>(id, &deps.db_pool).await?
    };

    let event = match deleted {
        Some(_) => ModerationEvent::Deleted {
            kind: M::KIND,
            item_id: id.into_uuid(),
        },
        None => ModerationEvent::DeleteIgnored {
            kind: M::KIND,
            item_id: id.into_uuid(),
        },
    };
    event.record();

    Ok(())
}

/// Counts of non-deleted items per status, every status present.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCounts {
    pub kind: ContentKind,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub archived: i64,
}

impl StatusCounts {
    pub fn get(&self, status: ModerationStatus) -> i64 {
        match status {
            ModerationStatus::Pending => self.pending,
            ModerationStatus::Approved => self.approved,
            ModerationStatus::Rejected => self.rejected,
            ModerationStatus::Archived => self.archived,
        }
    }

    pub fn total(&self) -> i64 {
        self.pending + self.approved + self.rejected + self.archived
    }
}

/// Moderation queue counts for `kind`, after read-triggered archival.
pub async fn status_counts(kind: ContentKind, deps: &BackofficeDeps) -> ModerationResult<StatusCounts> {
    crate::domains::archival::reconcile_expired(kind, Utc::now(), &deps.db_pool).await?;

    let mut counts = StatusCounts {
        kind,
        pending: 0,
        approved: 0,
        rejected: 0,
        archived: 0,
    };
    for (status, count) in store::count_by_status(kind, &deps.db_pool).await? {
        match status {
            ModerationStatus::Pending => counts.pending = count,
            ModerationStatus::Approved => counts.approved = count,
            ModerationStatus::Rejected => counts.rejected = count,
            ModerationStatus::Archived => counts.archived = count,
        }
    }
    Ok(counts)
}

/// Ask the machine; map a refusal to `InvalidTransition` and return the
/// status the conditional UPDATE must match.
fn require_apply<M: Moderatable>(
    item: &M,
    transition: Transition,
) -> ModerationResult<ModerationStatus> {
    match ModerationMachine::decide(item.review().status, transition) {
        Ok(Decision::Apply { from, .. }) => Ok(from),
        Ok(Decision::AlreadyApplied) => Err(invalid::<M>(
            item.id(),
            transition,
            format!("already {}", transition.target_status()),
        )),
        Err(refusal) => Err(invalid::<M>(item.id(), transition, refusal.to_string())),
    }
}

pub(crate) fn invalid<M: Moderatable>(
    id: Id<M::Entity>,
    transition: Transition,
    reason: String,
) -> ModerationError {
    ModerationError::InvalidTransition {
        kind: M::KIND.label(),
        id: id.into_uuid(),
        action: transition.action(),
        reason,
    }
}

/// Explain a conditional UPDATE that matched no row. A row deleted since it
/// was read is `NotFound`; a row another writer moved first is
/// `ConflictWriteLost`.
pub(crate) async fn write_lost<M: Moderatable>(
    id: Id<M::Entity>,
    action: &'static str,
    pool: &PgPool,
) -> ModerationError {
    match store::find_by_id::<M>(id, pool).await {
        Ok(Some(current)) if !current.review().is_deleted() => {}
        Ok(_) => return store::not_found::<M>(id),
        Err(err) => return err,
    }

    ModerationEvent::WriteLost {
        kind: M::KIND,
        item_id: id.into_uuid(),
        action: action.to_string(),
    }
    .record();

    ModerationError::ConflictWriteLost {
        kind: M::KIND.label(),
        id: id.into_uuid(),
        action,
    }
}
