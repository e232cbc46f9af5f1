use chrono::Utc;
use sqlx::{FromRow, Row};
use tracing::debug;

use crate::common::{ModerationError, ModerationResult, Page, PageMeta, PageRequest};
use crate::domains::archival;
use crate::domains::audience::Viewer;
use crate::domains::listing::models::{query, ListFilter};
use crate::domains::moderation::models::Moderatable;
use crate::kernel::BackofficeDeps;

/// One page of non-deleted items of kind `M`.
///
/// Expired approved items are archived before the query runs, so status
/// filters and counts never show stale `approved` rows. Announcements are
/// always restricted to what `viewer` is allowed to see, and a viewer is
/// required for them.
pub async fn list<M: Moderatable>(
    filter: &ListFilter,
    page: PageRequest,
    viewer: Option<&Viewer>,
    deps: &BackofficeDeps,
) -> ModerationResult<Page<M>> {
    let page = page.validate(&deps.paging)?;
    filter.validate_for(M::KIND)?;
    if M::KIND.is_targeted() && viewer.is_none() {
        return Err(ModerationError::validation(format!(
            "a viewer is required to list {} items",
            M::KIND.label()
        )));
    }

    let now = Utc::now();
    archival::reconcile_expired(M::KIND, now, &deps.db_pool).await?;

    let mut qb = query::page_query(M::KIND, filter, viewer, now, &page)?;
    debug!(kind = %M::KIND, sql = %qb.sql(), "Listing query");

    let rows = qb.build().fetch_all(&deps.db_pool).await?;

    let total = match rows.first() {
        Some(row) => row.try_get::<i64, _>("total_count")?,
        None if page.page() > 1 => {
            let mut count = query::count_query(M::KIND, filter, viewer, now);
            count
                .build_query_scalar::<i64>()
                .fetch_one(&deps.db_pool)
                .await?
        }
        None => 0,
    };

    let items = rows
        .iter()
        .map(|row| M::from_row(row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        items,
        meta: PageMeta::new(&page, total),
    })
}
