//! Dependencies handed to every moderation, archival and listing operation.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::common::PagingLimits;
use crate::config::{Config, Policies};
use crate::domains::archival::ArchivalPolicy;
use crate::domains::audience::AudienceEstimates;

/// Per-process dependency container. Holds no mutable state: everything a
/// request changes lives in the database.
#[derive(Clone)]
pub struct BackofficeDeps {
    pub db_pool: PgPool,
    pub audience: AudienceEstimates,
    pub archival: ArchivalPolicy,
    pub paging: PagingLimits,
}

impl BackofficeDeps {
    /// Dependencies with default estimation constants, archival offsets and
    /// page limits.
    pub fn new(db_pool: PgPool) -> Self {
        Self::from_policies(db_pool, &Policies::default())
    }

    pub fn from_policies(db_pool: PgPool, policies: &Policies) -> Self {
        Self {
            db_pool,
            audience: policies.audience,
            archival: policies.archival,
            paging: policies.paging,
        }
    }

    /// Connect to the configured database and build dependencies from `config`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::from_policies(pool, &config.policies))
    }
}
