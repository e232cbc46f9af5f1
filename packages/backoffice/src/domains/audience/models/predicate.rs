use sqlx::{Postgres, QueryBuilder};

use super::Viewer;

/// Appends the SQL form of `AudienceDescriptor::is_visible_to` for `viewer`
/// against the announcement row aliased as `alias`.
///
/// `NULL = ANY(..)` is NULL, so a viewer without a home neighborhood never
/// matches a neighborhood-targeted row.
pub fn push_visibility_predicate(qb: &mut QueryBuilder<'_, Postgres>, alias: &str, viewer: &Viewer) {
    qb.push("(");
    qb.push(alias).push(".target_type = 'all'");
    qb.push(" OR (").push(alias).push(".target_type = 'neighborhoods' AND ");
    qb.push_bind(viewer.neighborhood_id);
    qb.push(" = ANY(").push(alias).push(".target_neighborhoods))");
    qb.push(" OR (").push(alias).push(".target_type = 'users' AND ");
    qb.push_bind(viewer.member_id);
    qb.push(" = ANY(").push(alias).push(".target_user_ids))");
    qb.push(")");
}
