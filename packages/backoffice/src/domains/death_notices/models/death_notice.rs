use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::validation::{optional_text, required_text, MAX_BODY_LEN, MAX_TITLE_LEN};
use crate::common::{entity_ids, CemeteryId, DeathNoticeId, ModerationResult, MosqueId};
use crate::domains::archival::{self, ArchivalPolicy};
use crate::domains::moderation::models::{store, ContentKind, Moderatable, Origin, ReviewState};

/// A death notice. Its `archive_at` is derived from the funeral date and is
/// rewritten whenever the funeral date changes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeathNotice {
    pub id: DeathNoticeId,
    pub deceased_name: String,
    pub funeral_date: NaiveDate,
    pub funeral_time: Option<NaiveTime>,
    pub funeral_location: Option<String>,
    pub cemetery_id: Option<CemeteryId>,
    pub mosque_id: Option<MosqueId>,
    pub notes: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: ReviewState,
}

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateDeathNotice {
    pub deceased_name: String,
    pub funeral_date: NaiveDate,
    #[builder(default)]
    pub funeral_time: Option<NaiveTime>,
    #[builder(default)]
    pub funeral_location: Option<String>,
    #[builder(default)]
    pub cemetery_id: Option<CemeteryId>,
    #[builder(default)]
    pub mosque_id: Option<MosqueId>,
    #[builder(default)]
    pub notes: Option<String>,
}

impl Moderatable for DeathNotice {
    type Entity = entity_ids::DeathNotice;
    const KIND: ContentKind = ContentKind::DeathNotice;

    fn id(&self) -> DeathNoticeId {
        self.id
    }

    fn review(&self) -> &ReviewState {
        &self.review
    }
}

impl DeathNotice {
    pub async fn create(
        input: CreateDeathNotice,
        origin: Origin,
        policy: &ArchivalPolicy,
        pool: &PgPool,
    ) -> ModerationResult<Self> {
        let deceased_name = required_text("deceased_name", &input.deceased_name, MAX_TITLE_LEN)?;
        let funeral_location =
            optional_text("funeral_location", input.funeral_location.as_deref(), MAX_TITLE_LEN)?;
        let notes = optional_text("notes", input.notes.as_deref(), MAX_BODY_LEN)?;
        let archive_at = policy.archive_at(ContentKind::DeathNotice, input.funeral_date)?;

        let notice = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO death_notices (
                id, deceased_name, funeral_date, funeral_time, funeral_location,
                cemetery_id, mosque_id, notes, archive_at,
                status, submitted_by, reviewed_by, reviewed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(DeathNoticeId::new())
        .bind(deceased_name)
        .bind(input.funeral_date)
        .bind(input.funeral_time)
        .bind(funeral_location)
        .bind(input.cemetery_id)
        .bind(input.mosque_id)
        .bind(notes)
        .bind(archive_at)
        .bind(origin.initial_status())
        .bind(origin.author())
        .bind(origin.reviewed_by())
        .bind(origin.reviewed_at(Utc::now()))
        .fetch_one(pool)
        .await?;

        Ok(notice)
    }

    pub async fn find_live(id: DeathNoticeId, pool: &PgPool) -> ModerationResult<Self> {
        store::find_live::<Self>(id, Utc::now(), pool).await
    }

    /// Correct the funeral date and rewrite `archive_at` in the same UPDATE.
    ///
    /// Status is not touched here. A notice already archived stays archived
    /// even if the new deadline is in the future; one whose new deadline has
    /// already passed is archived by the read that follows the write.
    pub async fn reschedule_funeral(
        id: DeathNoticeId,
        funeral_date: NaiveDate,
        policy: &ArchivalPolicy,
        pool: &PgPool,
    ) -> ModerationResult<Self> {
        let now = Utc::now();
        let current = store::find_live::<Self>(id, now, pool).await?;
        let archive_at = policy.archive_at(ContentKind::DeathNotice, funeral_date)?;

        info!(
            id = %id,
            old_funeral_date = %current.funeral_date,
            new_funeral_date = %funeral_date,
            archive_at = ?archive_at,
            "Rescheduling funeral"
        );

        let updated = sqlx::query_as::<_, Self>(
            r#"
            UPDATE death_notices
            SET funeral_date = $2, archive_at = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(funeral_date)
        .bind(archive_at)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| store::not_found::<Self>(id))?;

        archival::settle(updated, now, pool).await
    }
}
