//! Lazy transition-on-read for archive deadlines.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::common::ModerationResult;
use crate::domains::moderation::events::ModerationEvent;
use crate::domains::moderation::machines::{Decision, ModerationMachine, Transition};
use crate::domains::moderation::models::{store, ContentKind, Moderatable};

/// Bring one freshly read item up to date with its archive deadline.
///
/// Safe to call repeatedly: an item that is not due, or already archived,
/// comes back untouched. If another writer moves the row between our read
/// and our write, the stored row is re-read and returned instead.
pub async fn settle<M: Moderatable>(item: M, now: DateTime<Utc>, pool: &PgPool) -> ModerationResult<M> {
    if !item.review().needs_auto_archive(now) {
        return Ok(item);
    }

    match ModerationMachine::decide(item.review().status, Transition::AutoArchive) {
        Ok(Decision::Apply { .. }) => {}
        Ok(Decision::AlreadyApplied) | Err(_) => return Ok(item),
    }

    let id = item.id();
    match store::mark_expired_archived::<M>(id, now, pool).await? {
        Some(archived) => {
            ModerationEvent::AutoArchived {
                kind: M::KIND,
                item_id: id.into_uuid(),
            }
            .record();
            Ok(archived)
        }
        None => {
            debug!(kind = %M::KIND, id = %id, "Archive deadline already handled by another writer");
            store::find_by_id::<M>(id, pool)
                .await?
                .filter(|current| !current.review().is_deleted())
                .ok_or_else(|| store::not_found::<M>(id))
        }
    }
}

/// Archive every approved item of `kind` whose deadline has passed at `now`.
///
/// Listings call this before querying so status filters see fresh values;
/// operators can call it to force freshness for items nobody has read.
pub async fn reconcile_expired(
    kind: ContentKind,
    now: DateTime<Utc>,
    pool: &PgPool,
) -> ModerationResult<u64> {
    let archived = store::archive_all_expired(kind, now, pool).await?;
    if archived > 0 {
        ModerationEvent::ExpiredReconciled { kind, archived }.record();
    }
    Ok(archived)
}

/// `reconcile_expired` for every content kind; returns per-kind counts.
pub async fn reconcile_all(
    now: DateTime<Utc>,
    pool: &PgPool,
) -> ModerationResult<Vec<(ContentKind, u64)>> {
    let mut results = Vec::with_capacity(ContentKind::ALL.len());
    for kind in ContentKind::ALL {
        let archived = reconcile_expired(kind, now, pool).await?;
        results.push((kind, archived));
    }
    info!(kinds = results.len(), "Archival reconciliation finished");
    Ok(results)
}
