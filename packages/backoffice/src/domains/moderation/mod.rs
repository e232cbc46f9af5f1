//! Moderation domain - the review lifecycle shared by ads, death notices,
//! campaigns and announcements.

pub mod actions;
pub mod events;
pub mod machines;
pub mod models;

pub use actions::{approve, archive, delete, reject, status_counts, ModerationOutcome, StatusCounts};
pub use events::ModerationEvent;
pub use machines::{Decision, ModerationMachine, Transition};
pub use models::{
    ContentKind, Moderatable, ModerationStatus, Origin, PresetReason, RejectionReason,
    ReviewState,
};
