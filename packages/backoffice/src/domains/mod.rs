// Shared lifecycle
pub mod archival;
pub mod audience;
pub mod listing;
pub mod moderation;

// Content kinds
pub mod ads;
pub mod announcements;
pub mod campaigns;
pub mod death_notices;
