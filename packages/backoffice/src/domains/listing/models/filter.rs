use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{ModerationError, ModerationResult};
use crate::domains::announcements::Priority;
use crate::domains::moderation::models::{ContentKind, ModerationStatus};

/// Optional listing filters. Absent fields do not restrict the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilter {
    pub status: Option<ModerationStatus>,
    /// Case-insensitive substring of the kind's search column.
    pub search: Option<String>,
    /// Exact match on `ad_type_id` / `campaign_type_id`.
    pub type_id: Option<Uuid>,
    /// Announcements only.
    pub priority: Option<Priority>,
    #[serde(default)]
    pub sort: Sort,
}

impl ListFilter {
    pub fn with_status(mut self, status: ModerationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_type_id(mut self, type_id: Uuid) -> Self {
        self.type_id = Some(type_id);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = Sort { key, direction };
        self
    }

    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Rejects filters and sort keys that do not exist for `kind`.
    pub fn validate_for(&self, kind: ContentKind) -> ModerationResult<()> {
        if self.type_id.is_some() && kind.type_column().is_none() {
            return Err(ModerationError::validation(format!(
                "{} listings have no type filter",
                kind.label()
            )));
        }
        if self.priority.is_some() && kind != ContentKind::Announcement {
            return Err(ModerationError::validation(format!(
                "{} listings have no priority filter",
                kind.label()
            )));
        }
        self.sort.key.column(kind)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    /// The kind's domain date (expiry, funeral date, campaign end).
    DomainDate,
    /// The kind's search column.
    Name,
}

impl SortKey {
    pub fn column(&self, kind: ContentKind) -> ModerationResult<&'static str> {
        match self {
            SortKey::CreatedAt => Ok("created_at"),
            SortKey::UpdatedAt => Ok("updated_at"),
            SortKey::Name => Ok(kind.search_column()),
            SortKey::DomainDate => kind.domain_date_column().ok_or_else(|| {
                ModerationError::validation(format!(
                    "{} listings cannot be sorted by domain date",
                    kind.label()
                ))
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Newest first unless the caller asks otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}
