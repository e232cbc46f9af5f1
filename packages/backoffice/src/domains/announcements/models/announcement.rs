use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};
use typed_builder::TypedBuilder;

use crate::common::validation::{required_text, MAX_BODY_LEN, MAX_TITLE_LEN};
use crate::common::{
    entity_ids, AnnouncementId, MemberId, ModerationError, ModerationResult, NeighborhoodId,
};
use crate::domains::audience::{push_visibility_predicate, AudienceDescriptor, TargetType, Viewer};
use crate::domains::moderation::models::{store, ContentKind, Moderatable, Origin, ReviewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "announcement_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ModerationError;

    fn from_str(s: &str) -> ModerationResult<Self> {
        match s {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(ModerationError::validation(format!("Invalid priority: {}", s))),
        }
    }
}

/// An announcement pushed to an audience. Approval is publication: the first
/// approval (or a staff send) stamps `sent_at`, which never changes again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    #[serde(flatten)]
    pub audience: AudienceDescriptor,
    pub visible_until: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    #[serde(flatten)]
    pub review: ReviewState,
}

// The audience is stored as a discriminator plus two arrays; rebuilding the
// tagged descriptor rejects rows that break the one-shape rule.
impl<'r> FromRow<'r, PgRow> for Announcement {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let target_type: String = row.try_get("target_type")?;
        let target_type: TargetType = target_type
            .parse()
            .map_err(|e| column_decode("target_type", e))?;
        let target_neighborhoods: Vec<NeighborhoodId> = row.try_get("target_neighborhoods")?;
        let target_user_ids: Vec<MemberId> = row.try_get("target_user_ids")?;
        let audience =
            AudienceDescriptor::from_parts(target_type, target_neighborhoods, target_user_ids)
                .map_err(|e| column_decode("target_type", e))?;

        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            priority: row.try_get("priority")?,
            audience,
            visible_until: row.try_get("visible_until")?,
            sent_at: row.try_get("sent_at")?,
            view_count: row.try_get("view_count")?,
            review: ReviewState::from_row(row)?,
        })
    }
}

fn column_decode(column: &str, error: ModerationError) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    }
}

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateAnnouncement {
    pub title: String,
    pub body: String,
    pub audience: AudienceDescriptor,
    #[builder(default)]
    pub priority: Priority,
    #[builder(default)]
    pub visible_until: Option<DateTime<Utc>>,
    /// Staff-authored announcements go out immediately unless this is false.
    /// Submitted announcements are sent when they are approved.
    #[builder(default = true)]
    pub send_now: bool,
}

impl Moderatable for Announcement {
    type Entity = entity_ids::Announcement;
    const KIND: ContentKind = ContentKind::Announcement;

    fn id(&self) -> AnnouncementId {
        self.id
    }

    fn review(&self) -> &ReviewState {
        &self.review
    }

    fn audience(&self) -> Option<&AudienceDescriptor> {
        Some(&self.audience)
    }
}

impl Announcement {
    pub fn is_sent(&self) -> bool {
        self.sent_at.is_some()
    }

    pub async fn create(
        input: CreateAnnouncement,
        origin: Origin,
        pool: &PgPool,
    ) -> ModerationResult<Self> {
        let title = required_text("title", &input.title, MAX_TITLE_LEN)?;
        let body = required_text("body", &input.body, MAX_BODY_LEN)?;
        input.audience.validate()?;

        let now = Utc::now();
        let sent_at = match origin {
            Origin::StaffAuthored { .. } if input.send_now => Some(now),
            _ => None,
        };
        let (target_type, target_neighborhoods, target_user_ids) = input.audience.to_columns();

        let announcement = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO announcements (
                id, title, body, priority, target_type, target_neighborhoods, target_user_ids,
                visible_until, sent_at, status, submitted_by, reviewed_by, reviewed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(AnnouncementId::new())
        .bind(title)
        .bind(body)
        .bind(input.priority)
        .bind(target_type.as_str())
        .bind(target_neighborhoods)
        .bind(target_user_ids)
        .bind(input.visible_until)
        .bind(sent_at)
        .bind(origin.initial_status())
        .bind(origin.author())
        .bind(origin.reviewed_by())
        .bind(origin.reviewed_at(now))
        .fetch_one(pool)
        .await?;

        Ok(announcement)
    }

    pub async fn find_live(id: AnnouncementId, pool: &PgPool) -> ModerationResult<Self> {
        store::find_live::<Self>(id, Utc::now(), pool).await
    }

    /// Stamp `sent_at` on an approved, unsent announcement. `None` when the
    /// row no longer matches (already sent, moved, or deleted).
    pub async fn mark_sent(id: AnnouncementId, pool: &PgPool) -> ModerationResult<Option<Self>> {
        let announcement = sqlx::query_as::<_, Self>(
            r#"
            UPDATE announcements
            SET sent_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'approved' AND sent_at IS NULL AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(announcement)
    }

    /// Replace the audience of an unsent announcement.
    pub async fn update_audience(
        id: AnnouncementId,
        audience: &AudienceDescriptor,
        pool: &PgPool,
    ) -> ModerationResult<Option<Self>> {
        let (target_type, target_neighborhoods, target_user_ids) = audience.to_columns();
        let announcement = sqlx::query_as::<_, Self>(
            r#"
            UPDATE announcements
            SET target_type = $2, target_neighborhoods = $3, target_user_ids = $4, updated_at = NOW()
            WHERE id = $1 AND sent_at IS NULL AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(target_type.as_str())
        .bind(target_neighborhoods)
        .bind(target_user_ids)
        .fetch_optional(pool)
        .await?;
        Ok(announcement)
    }

    /// Count one view by `viewer`, only if the announcement is live and the
    /// viewer is in its audience. Returns the new count.
    pub async fn increment_views(
        id: AnnouncementId,
        viewer: &Viewer,
        now: DateTime<Utc>,
        pool: &PgPool,
    ) -> ModerationResult<Option<i64>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "UPDATE announcements a SET view_count = a.view_count + 1 WHERE a.id = ",
        );
        qb.push_bind(id);
        qb.push(" AND a.status = 'approved' AND a.deleted_at IS NULL");
        qb.push(" AND (a.visible_until IS NULL OR a.visible_until > ");
        qb.push_bind(now);
        qb.push(") AND ");
        push_visibility_predicate(&mut qb, "a", viewer);
        qb.push(" RETURNING a.view_count");

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_optional(pool)
            .await?;
        Ok(count)
    }
}
