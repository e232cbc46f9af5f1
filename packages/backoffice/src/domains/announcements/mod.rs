//! Announcements - moderated content with an audience.

pub mod actions;
pub mod models;

pub use actions::{create, record_view, retarget, send};
pub use models::{Announcement, CreateAnnouncement, Priority};
