use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::common::validation::{required_text, MAX_BODY_LEN, MAX_TITLE_LEN};
use crate::common::{entity_ids, CampaignId, ModerationError, ModerationResult};
use crate::domains::moderation::models::{store, ContentKind, Moderatable, Origin, ReviewState};

/// A fundraising or awareness campaign, valid between two dates.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub campaign_type_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: ReviewState,
}

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateCampaign {
    pub title: String,
    pub description: String,
    pub campaign_type_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

impl CreateCampaign {
    fn validate_window(&self) -> ModerationResult<()> {
        if self.ends_on < self.starts_on {
            return Err(ModerationError::validation(format!(
                "ends_on ({}) must not be before starts_on ({})",
                self.ends_on, self.starts_on
            )));
        }
        Ok(())
    }
}

impl Moderatable for Campaign {
    type Entity = entity_ids::Campaign;
    const KIND: ContentKind = ContentKind::Campaign;

    fn id(&self) -> CampaignId {
        self.id
    }

    fn review(&self) -> &ReviewState {
        &self.review
    }
}

impl Campaign {
    pub async fn create(
        input: CreateCampaign,
        origin: Origin,
        pool: &PgPool,
    ) -> ModerationResult<Self> {
        let title = required_text("title", &input.title, MAX_TITLE_LEN)?;
        let description = required_text("description", &input.description, MAX_BODY_LEN)?;
        input.validate_window()?;

        let campaign = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO campaigns (
                id, title, description, campaign_type_id, starts_on, ends_on,
                status, submitted_by, reviewed_by, reviewed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(CampaignId::new())
        .bind(title)
        .bind(description)
        .bind(input.campaign_type_id)
        .bind(input.starts_on)
        .bind(input.ends_on)
        .bind(origin.initial_status())
        .bind(origin.author())
        .bind(origin.reviewed_by())
        .bind(origin.reviewed_at(Utc::now()))
        .fetch_one(pool)
        .await?;

        Ok(campaign)
    }

    pub async fn find_live(id: CampaignId, pool: &PgPool) -> ModerationResult<Self> {
        store::find_live::<Self>(id, Utc::now(), pool).await
    }
}
