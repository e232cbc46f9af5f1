// Community Back Office - Moderation Core
//
// Review lifecycle for ads, death notices, campaigns and announcements:
// a pending/approved/rejected/archived state machine guarded by conditional
// updates, derived archive deadlines applied lazily on read, and audience
// targeting for announcements.
//
// Request handlers, authentication and notification delivery live elsewhere
// and call into the actions under domains/*/actions.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
