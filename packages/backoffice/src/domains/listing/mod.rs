//! Listing domain - filtered, paginated moderation queues
//!
//! The one place where status, free-text search, audience visibility and
//! archival freshness compose into a single query.

pub mod actions;
pub mod models;

pub use actions::list;
pub use models::{ListFilter, Sort, SortDirection, SortKey};
