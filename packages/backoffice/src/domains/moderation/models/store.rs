//! SQL shared by every moderatable table.
//!
//! Every state change is a conditional UPDATE guarded by the expected prior
//! status, so two concurrent writers can never both apply a transition: the
//! loser matches zero rows and gets `None` back.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{ContentKind, Moderatable, ModerationStatus};
use crate::common::{Id, MemberId, ModerationError, ModerationResult};
use crate::domains::archival;

/// Find an item by id, including soft-deleted rows.
pub async fn find_by_id<M: Moderatable>(
    id: Id<M::Entity>,
    pool: &PgPool,
) -> ModerationResult<Option<M>> {
    let sql = format!("SELECT * FROM {} WHERE id = $1", M::KIND.table());
    let item = sqlx::query_as::<_, M>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Find a non-deleted item and bring its archival state up to date.
///
/// This is the read every moderation action starts from. An approved item
/// whose `archive_at` has passed is archived here, before the caller sees it.
pub async fn find_live<M: Moderatable>(
    id: Id<M::Entity>,
    now: DateTime<Utc>,
    pool: &PgPool,
) -> ModerationResult<M> {
    let item = find_by_id::<M>(id, pool)
        .await?
        .filter(|item| !item.review().is_deleted())
        .ok_or_else(|| not_found::<M>(id))?;

    archival::settle(item, now, pool).await
}

pub(crate) fn not_found<M: Moderatable>(id: Id<M::Entity>) -> ModerationError {
    ModerationError::NotFound {
        kind: M::KIND.label(),
        id: id.into_uuid(),
    }
}

/// pending -> approved
pub(crate) async fn mark_approved<M: Moderatable>(
    id: Id<M::Entity>,
    from: ModerationStatus,
    reviewer: MemberId,
    pool: &PgPool,
) -> ModerationResult<Option<M>> {
    let sql = format!(
        r#"
        UPDATE {table}
        SET status = 'approved', reviewed_by = $2, reviewed_at = NOW(), updated_at = NOW(){extra}
        WHERE id = $1 AND status = $3 AND deleted_at IS NULL
        RETURNING *
        "#,
        table = M::KIND.table(),
        extra = M::KIND.on_approve_sql(),
    );
    let item = sqlx::query_as::<_, M>(&sql)
        .bind(id)
        .bind(reviewer)
        .bind(from)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// pending -> rejected
pub(crate) async fn mark_rejected<M: Moderatable>(
    id: Id<M::Entity>,
    from: ModerationStatus,
    reviewer: MemberId,
    reason: &str,
    pool: &PgPool,
) -> ModerationResult<Option<M>> {
    let sql = format!(
        r#"
        UPDATE {}
        SET status = 'rejected', reviewed_by = $2, reviewed_at = NOW(),
            rejection_reason = $3, updated_at = NOW()
        WHERE id = $1 AND status = $4 AND deleted_at IS NULL
        RETURNING *
        "#,
        M::KIND.table()
    );
    let item = sqlx::query_as::<_, M>(&sql)
        .bind(id)
        .bind(reviewer)
        .bind(reason)
        .bind(from)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// approved -> archived (explicit admin action)
pub(crate) async fn mark_archived<M: Moderatable>(
    id: Id<M::Entity>,
    from: ModerationStatus,
    pool: &PgPool,
) -> ModerationResult<Option<M>> {
    let sql = format!(
        r#"
        UPDATE {}
        SET status = 'archived', updated_at = NOW()
        WHERE id = $1 AND status = $2 AND deleted_at IS NULL
        RETURNING *
        "#,
        M::KIND.table()
    );
    let item = sqlx::query_as::<_, M>(&sql)
        .bind(id)
        .bind(from)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// approved -> archived, only if `archive_at` has passed at `now`.
pub(crate) async fn mark_expired_archived<M: Moderatable>(
    id: Id<M::Entity>,
    now: DateTime<Utc>,
    pool: &PgPool,
) -> ModerationResult<Option<M>> {
    let sql = format!(
        r#"
        UPDATE {}
        SET status = 'archived', updated_at = NOW()
        WHERE id = $1
          AND status = 'approved'
          AND archive_at IS NOT NULL
          AND archive_at <= $2
          AND deleted_at IS NULL
        RETURNING *
        "#,
        M::KIND.table()
    );
    let item = sqlx::query_as::<_, M>(&sql)
        .bind(id)
        .bind(now)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Archive every approved row of `kind` whose `archive_at` has passed.
pub(crate) async fn archive_all_expired(
    kind: ContentKind,
    now: DateTime<Utc>,
    pool: &PgPool,
) -> ModerationResult<u64> {
    let sql = format!(
        r#"
        UPDATE {}
        SET status = 'archived', updated_at = NOW()
        WHERE status = 'approved'
          AND archive_at IS NOT NULL
          AND archive_at <= $1
          AND deleted_at IS NULL
        "#,
        kind.table()
    );
    let result = sqlx::query(&sql).bind(now).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Set the tombstone. Status is left untouched.
pub(crate) async fn mark_deleted<M: Moderatable>(
    id: Id<M::Entity>,
    pool: &PgPool,
) -> ModerationResult<Option<M>> {
    let sql = format!(
        r#"
        UPDATE {}
        SET deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
        M::KIND.table()
    );
    let item = sqlx::query_as::<_, M>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

/// Non-deleted row counts per status for `kind`.
pub async fn count_by_status(
    kind: ContentKind,
    pool: &PgPool,
) -> ModerationResult<Vec<(ModerationStatus, i64)>> {
    let sql = format!(
        r#"
        SELECT status, COUNT(*) AS count
        FROM {}
        WHERE deleted_at IS NULL
        GROUP BY status
        "#,
        kind.table()
    );
    let rows = sqlx::query_as::<_, (ModerationStatus, i64)>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
