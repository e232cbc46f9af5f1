use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::common::PagingLimits;
use crate::domains::archival::ArchivalPolicy;
use crate::domains::audience::AudienceEstimates;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub policies: Policies,
}

/// Estimation constants, archival offsets and page limits. None of these
/// need a database, so commands that only compute can load them alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Policies {
    pub audience: AudienceEstimates,
    pub archival: ArchivalPolicy,
    pub paging: PagingLimits,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let policies = Policies::from_env()?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            policies,
        })
    }
}

impl Policies {
    /// Load policy settings from environment variables. `DATABASE_URL` is
    /// not read.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        let policies = Self {
            audience: AudienceEstimates {
                all: parse_or("AUDIENCE_ESTIMATE_ALL", defaults.audience.all)?,
                per_neighborhood: parse_or(
                    "AUDIENCE_ESTIMATE_PER_NEIGHBORHOOD",
                    defaults.audience.per_neighborhood,
                )?,
            },
            archival: ArchivalPolicy {
                death_notice_days: parse_or(
                    "DEATH_NOTICE_ARCHIVE_DAYS",
                    defaults.archival.death_notice_days,
                )?,
            },
            paging: PagingLimits {
                default_limit: parse_or("LISTING_DEFAULT_PAGE_SIZE", defaults.paging.default_limit)?,
                max_limit: parse_or("LISTING_MAX_PAGE_SIZE", defaults.paging.max_limit)?,
            },
        };

        policies.validate()?;
        Ok(policies)
    }

    pub fn validate(&self) -> Result<()> {
        if self.audience.all < 0 || self.audience.per_neighborhood < 0 {
            anyhow::bail!(
                "AUDIENCE_ESTIMATE_ALL and AUDIENCE_ESTIMATE_PER_NEIGHBORHOOD must not be negative"
            );
        }

        self.archival
            .validate()
            .context("DEATH_NOTICE_ARCHIVE_DAYS is invalid")?;

        if self.paging.max_limit < 1
            || !(1..=self.paging.max_limit).contains(&self.paging.default_limit)
        {
            anyhow::bail!(
                "LISTING_DEFAULT_PAGE_SIZE must be between 1 and LISTING_MAX_PAGE_SIZE ({})",
                self.paging.max_limit
            );
        }

        Ok(())
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number (got {:?})", name, raw)),
        Err(_) => Ok(default),
    }
}
