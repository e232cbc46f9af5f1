pub mod content_kind;
pub mod moderatable;
pub mod origin;
pub mod reason;
pub mod review;
pub mod status;
pub mod store;

pub use content_kind::ContentKind;
pub use moderatable::Moderatable;
pub use origin::Origin;
pub use reason::{PresetReason, RejectionReason};
pub use review::ReviewState;
pub use status::ModerationStatus;
