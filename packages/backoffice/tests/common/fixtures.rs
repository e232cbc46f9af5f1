//! Test fixtures for creating test data through the model constructors.

use anyhow::Result;
use backoffice_core::common::{MemberId, NeighborhoodId};
use backoffice_core::domains::ads::{Ad, CreateAd};
use backoffice_core::domains::announcements::{self, Announcement, CreateAnnouncement};
use backoffice_core::domains::audience::AudienceDescriptor;
use backoffice_core::domains::campaigns::{Campaign, CreateCampaign};
use backoffice_core::domains::death_notices::{CreateDeathNotice, DeathNotice};
use backoffice_core::domains::moderation::Origin;
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use super::TestHarness;

pub fn submitted() -> Origin {
    Origin::Submitted {
        by: MemberId::new(),
    }
}

pub fn staff() -> Origin {
    Origin::StaffAuthored {
        by: MemberId::new(),
    }
}

/// A short random token for scoping search-based assertions to one test.
pub fn unique_token() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}

pub async fn create_ad(
    ctx: &TestHarness,
    title: &str,
    ad_type_id: Uuid,
    origin: Origin,
) -> Result<Ad> {
    let input = CreateAd::builder()
        .title(title)
        .description("Test ad description")
        .ad_type_id(ad_type_id)
        .build();
    Ok(Ad::create(input, origin, &ctx.db_pool).await?)
}

pub async fn create_pending_ad(ctx: &TestHarness, title: &str) -> Result<Ad> {
    create_ad(ctx, title, Uuid::now_v7(), submitted()).await
}

pub async fn create_death_notice(
    ctx: &TestHarness,
    deceased_name: &str,
    funeral_date: NaiveDate,
    origin: Origin,
) -> Result<DeathNotice> {
    let input = CreateDeathNotice::builder()
        .deceased_name(deceased_name)
        .funeral_date(funeral_date)
        .build();
    Ok(DeathNotice::create(input, origin, &ctx.deps.archival, &ctx.db_pool).await?)
}

pub async fn create_campaign(ctx: &TestHarness, title: &str, origin: Origin) -> Result<Campaign> {
    let input = CreateCampaign::builder()
        .title(title)
        .description("Test campaign")
        .campaign_type_id(Uuid::now_v7())
        .starts_on(days_from_today(0))
        .ends_on(days_from_today(30))
        .build();
    Ok(Campaign::create(input, origin, &ctx.db_pool).await?)
}

pub async fn create_announcement(
    ctx: &TestHarness,
    title: &str,
    audience: AudienceDescriptor,
    origin: Origin,
) -> Result<Announcement> {
    let input = CreateAnnouncement::builder()
        .title(title)
        .body("Test announcement body")
        .audience(audience)
        .build();
    Ok(announcements::create(input, origin, &ctx.deps).await?.item)
}

pub fn neighborhood_audience(ids: &[NeighborhoodId]) -> AudienceDescriptor {
    AudienceDescriptor::neighborhoods(ids.iter().copied()).expect("non-empty neighborhoods")
}
