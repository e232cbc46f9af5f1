//! Typed ids for every entity the moderation core touches.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker for classified ads.
pub struct Ad;

/// Marker for death notices.
pub struct DeathNotice;

/// Marker for campaigns.
pub struct Campaign;

/// Marker for announcements.
pub struct Announcement;

/// Marker for members (submitters, reviewers, viewers).
pub struct Member;

/// Marker for neighborhoods (reference data, owned elsewhere).
pub struct Neighborhood;

/// Marker for cemeteries (reference data, owned elsewhere).
pub struct Cemetery;

/// Marker for mosques (reference data, owned elsewhere).
pub struct Mosque;

// ============================================================================
// Type aliases
// ============================================================================

pub type AdId = Id<Ad>;
pub type DeathNoticeId = Id<DeathNotice>;
pub type CampaignId = Id<Campaign>;
pub type AnnouncementId = Id<Announcement>;
pub type MemberId = Id<Member>;
pub type NeighborhoodId = Id<Neighborhood>;
pub type CemeteryId = Id<Cemetery>;
pub type MosqueId = Id<Mosque>;
