// Common types shared by every domain

pub mod entity_ids;
pub mod error;
pub mod id;
pub mod pagination;
pub mod validation;

pub use entity_ids::*;
pub use error::{ModerationError, ModerationResult, MAX_REASON_LEN};
pub use id::Id;
pub use pagination::{Page, PageMeta, PageRequest, PagingLimits, ValidatedPage};
