//! SQL composition for listings.
//!
//! Identifiers come from `ContentKind` and `SortKey`; every caller-supplied
//! value goes through `push_bind`.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use super::ListFilter;
use crate::common::{ModerationResult, ValidatedPage};
use crate::domains::audience::{push_visibility_predicate, Viewer};
use crate::domains::moderation::models::ContentKind;

const ALIAS: &str = "t";

/// `SELECT t.*, COUNT(*) OVER() AS total_count ...` for one page.
///
/// The window count is evaluated in the same statement as the page fetch,
/// so `total` and the rows come from one snapshot.
pub fn page_query(
    kind: ContentKind,
    filter: &ListFilter,
    viewer: Option<&Viewer>,
    now: DateTime<Utc>,
    page: &ValidatedPage,
) -> ModerationResult<QueryBuilder<'static, Postgres>> {
    let sort_column = filter.sort.key.column(kind)?;
    let direction = filter.sort.direction.as_sql();

    let mut qb = QueryBuilder::new(format!(
        "SELECT {ALIAS}.*, COUNT(*) OVER() AS total_count FROM {} {ALIAS}",
        kind.table()
    ));
    push_conditions(&mut qb, kind, filter, viewer, now);
    qb.push(format!(
        " ORDER BY {ALIAS}.{sort_column} {direction} NULLS LAST, {ALIAS}.id {direction}"
    ));
    qb.push(" LIMIT ").push_bind(page.limit());
    qb.push(" OFFSET ").push_bind(page.offset());
    Ok(qb)
}

/// `SELECT COUNT(*) ...` with the same conditions, used when the requested
/// page lies past the last row and the window count is unavailable.
pub fn count_query(
    kind: ContentKind,
    filter: &ListFilter,
    viewer: Option<&Viewer>,
    now: DateTime<Utc>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} {ALIAS}", kind.table()));
    push_conditions(&mut qb, kind, filter, viewer, now);
    qb
}

fn push_conditions(
    qb: &mut QueryBuilder<'static, Postgres>,
    kind: ContentKind,
    filter: &ListFilter,
    viewer: Option<&Viewer>,
    now: DateTime<Utc>,
) {
    qb.push(format!(" WHERE {ALIAS}.deleted_at IS NULL"));

    if let Some(status) = filter.status {
        qb.push(format!(" AND {ALIAS}.status = ")).push_bind(status);
    }

    if let Some(term) = filter.search_term() {
        qb.push(format!(" AND lower({ALIAS}.{}) LIKE lower(", kind.search_column()))
            .push_bind(format!("%{}%", escape_like(term)))
            .push(") ESCAPE '\\'");
    }

    if let (Some(type_id), Some(column)) = (filter.type_id, kind.type_column()) {
        qb.push(format!(" AND {ALIAS}.{column} = ")).push_bind(type_id);
    }

    if kind.is_targeted() {
        if let Some(priority) = filter.priority {
            qb.push(format!(" AND {ALIAS}.priority = ")).push_bind(priority);
        }
        qb.push(format!(
            " AND ({ALIAS}.visible_until IS NULL OR {ALIAS}.visible_until > "
        ))
        .push_bind(now)
        .push(")");
        if let Some(viewer) = viewer {
            qb.push(" AND ");
            push_visibility_predicate(qb, ALIAS, viewer);
        }
    }
}

/// Escape LIKE metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{MemberId, PageRequest, PagingLimits};
    use crate::domains::announcements::Priority;
    use crate::domains::moderation::models::ModerationStatus;

    fn page() -> ValidatedPage {
        PageRequest::new(2, 10)
            .validate(&PagingLimits::default())
            .unwrap()
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Hassan"), "Hassan");
    }

    #[test]
    fn page_query_always_excludes_deleted_rows() {
        let qb = page_query(ContentKind::Ad, &ListFilter::default(), None, Utc::now(), &page())
            .unwrap();
        let sql = qb.sql();
        assert!(sql.contains("FROM ads t WHERE t.deleted_at IS NULL"));
        assert!(sql.contains("COUNT(*) OVER() AS total_count"));
        assert!(sql.contains("ORDER BY t.created_at DESC NULLS LAST, t.id DESC"));
        assert!(sql.contains("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn filters_bind_in_order() {
        let filter = ListFilter::default()
            .with_status(ModerationStatus::Pending)
            .with_search("hassan");
        let qb = page_query(ContentKind::DeathNotice, &filter, None, Utc::now(), &page()).unwrap();
        let sql = qb.sql();
        assert!(sql.contains("t.status = $1"));
        assert!(sql.contains("lower(t.deceased_name) LIKE lower($2) ESCAPE '\\'"));
        assert!(!sql.contains("visible_until"));
    }

    #[test]
    fn announcements_are_scoped_to_the_viewer() {
        let viewer = Viewer::new(MemberId::new(), None);
        let filter = ListFilter::default().with_priority(Priority::High);
        let qb = page_query(
            ContentKind::Announcement,
            &filter,
            Some(&viewer),
            Utc::now(),
            &page(),
        )
        .unwrap();
        let sql = qb.sql();
        assert!(sql.contains("t.priority = $1"));
        assert!(sql.contains("t.visible_until IS NULL OR t.visible_until > $2"));
        assert!(sql.contains("t.target_type = 'all'"));
    }

    #[test]
    fn count_query_shares_conditions() {
        let filter = ListFilter::default().with_status(ModerationStatus::Approved);
        let qb = count_query(ContentKind::Campaign, &filter, None, Utc::now());
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM campaigns t WHERE t.deleted_at IS NULL AND t.status = $1"
        );
    }
}
