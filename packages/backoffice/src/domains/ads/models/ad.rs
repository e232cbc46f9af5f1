use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::common::validation::{optional_text, required_text, MAX_BODY_LEN, MAX_TITLE_LEN};
use crate::common::{entity_ids, AdId, ModerationError, ModerationResult, NeighborhoodId};
use crate::domains::moderation::models::{store, ContentKind, Moderatable, Origin, ReviewState};

/// A classified ad submitted by a member.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ad {
    pub id: AdId,
    pub title: String,
    pub description: String,
    pub ad_type_id: Uuid,
    pub price_cents: Option<i64>,
    pub contact_phone: Option<String>,
    pub neighborhood_id: Option<NeighborhoodId>,
    /// When the listing stops being relevant. Ads do not auto-archive.
    pub expires_on: Option<NaiveDate>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: ReviewState,
}

#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateAd {
    pub title: String,
    pub description: String,
    pub ad_type_id: Uuid,
    #[builder(default)]
    pub price_cents: Option<i64>,
    #[builder(default)]
    pub contact_phone: Option<String>,
    #[builder(default)]
    pub neighborhood_id: Option<NeighborhoodId>,
    #[builder(default)]
    pub expires_on: Option<NaiveDate>,
}

impl Moderatable for Ad {
    type Entity = entity_ids::Ad;
    const KIND: ContentKind = ContentKind::Ad;

    fn id(&self) -> AdId {
        self.id
    }

    fn review(&self) -> &ReviewState {
        &self.review
    }
}

impl Ad {
    pub async fn create(input: CreateAd, origin: Origin, pool: &PgPool) -> ModerationResult<Self> {
        let title = required_text("title", &input.title, MAX_TITLE_LEN)?;
        let description = required_text("description", &input.description, MAX_BODY_LEN)?;
        let contact_phone = optional_text("contact_phone", input.contact_phone.as_deref(), 32)?;
        if input.price_cents.is_some_and(|price| price < 0) {
            return Err(ModerationError::validation("price_cents must not be negative"));
        }

        let ad = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO ads (
                id, title, description, ad_type_id, price_cents, contact_phone,
                neighborhood_id, expires_on, status, submitted_by, reviewed_by, reviewed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(AdId::new())
        .bind(title)
        .bind(description)
        .bind(input.ad_type_id)
        .bind(input.price_cents)
        .bind(contact_phone)
        .bind(input.neighborhood_id)
        .bind(input.expires_on)
        .bind(origin.initial_status())
        .bind(origin.author())
        .bind(origin.reviewed_by())
        .bind(origin.reviewed_at(Utc::now()))
        .fetch_one(pool)
        .await?;

        Ok(ad)
    }

    pub async fn find_live(id: AdId, pool: &PgPool) -> ModerationResult<Self> {
        store::find_live::<Self>(id, Utc::now(), pool).await
    }
}
