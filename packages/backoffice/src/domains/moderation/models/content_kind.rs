use serde::{Deserialize, Serialize};

use crate::common::ModerationError;

/// The content types that share the moderation lifecycle.
///
/// Every table and column name that ends up in dynamic SQL comes from the
/// static strings returned here, never from request input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Ad,
    DeathNotice,
    Campaign,
    Announcement,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Ad,
        ContentKind::DeathNotice,
        ContentKind::Campaign,
        ContentKind::Announcement,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            ContentKind::Ad => "ads",
            ContentKind::DeathNotice => "death_notices",
            ContentKind::Campaign => "campaigns",
            ContentKind::Announcement => "announcements",
        }
    }

    /// Human-readable name used in errors and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Ad => "ad",
            ContentKind::DeathNotice => "death notice",
            ContentKind::Campaign => "campaign",
            ContentKind::Announcement => "announcement",
        }
    }

    /// Column matched by free-text search in listings.
    pub fn search_column(&self) -> &'static str {
        match self {
            ContentKind::DeathNotice => "deceased_name",
            ContentKind::Ad | ContentKind::Campaign | ContentKind::Announcement => "title",
        }
    }

    /// Type discriminator column filtered by `type_id`, where the kind has one.
    pub fn type_column(&self) -> Option<&'static str> {
        match self {
            ContentKind::Ad => Some("ad_type_id"),
            ContentKind::Campaign => Some("campaign_type_id"),
            ContentKind::DeathNotice | ContentKind::Announcement => None,
        }
    }

    /// Column holding the domain date, where the kind has one.
    pub fn domain_date_column(&self) -> Option<&'static str> {
        match self {
            ContentKind::Ad => Some("expires_on"),
            ContentKind::DeathNotice => Some("funeral_date"),
            ContentKind::Campaign => Some("ends_on"),
            ContentKind::Announcement => None,
        }
    }

    /// Whether listings of this kind are filtered by audience and `visible_until`.
    pub fn is_targeted(&self) -> bool {
        matches!(self, ContentKind::Announcement)
    }

    /// Extra assignments made when an item of this kind is approved.
    /// Approving an announcement publishes it, which stamps `sent_at` once.
    pub(crate) fn on_approve_sql(&self) -> &'static str {
        match self {
            ContentKind::Announcement => ", sent_at = COALESCE(sent_at, NOW())",
            _ => "",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = ModerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ad" | "ads" => Ok(ContentKind::Ad),
            "death_notice" | "death-notice" | "death_notices" | "death-notices" => {
                Ok(ContentKind::DeathNotice)
            }
            "campaign" | "campaigns" => Ok(ContentKind::Campaign),
            "announcement" | "announcements" => Ok(ContentKind::Announcement),
            _ => Err(ModerationError::validation(format!(
                "Invalid content kind: {}",
                s
            ))),
        }
    }
}
