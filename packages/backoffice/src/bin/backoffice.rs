//! Operator CLI for the moderation back office
//!
//! Runs migrations, forces archival reconciliation, and prints queue
//! statistics and audience estimates. Results are written to stdout as one
//! JSON object per line; logs go to stderr.

use anyhow::{Context, Result};
use backoffice_core::common::{MemberId, NeighborhoodId};
use backoffice_core::config::{Config, Policies};
use backoffice_core::domains::archival;
use backoffice_core::domains::audience::AudienceDescriptor;
use backoffice_core::domains::moderation::{status_counts, ContentKind};
use backoffice_core::kernel::BackofficeDeps;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(about = "Moderation back office operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending database migrations
    Migrate,

    /// Archive every approved item whose deadline has passed
    Reconcile {
        /// Limit to one content kind (ad, death_notice, campaign, announcement)
        #[arg(long)]
        kind: Option<ContentKind>,
    },

    /// Print per-status counts of the moderation queues
    Stats {
        #[arg(long)]
        kind: Option<ContentKind>,
    },

    /// Print the recipient estimate for an audience
    Estimate(EstimateArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct EstimateArgs {
    /// Everyone on the platform
    #[arg(long)]
    all: bool,

    /// One or more neighborhood ids
    #[arg(long, num_args = 1..)]
    neighborhoods: Vec<Uuid>,

    /// One or more member ids
    #[arg(long, num_args = 1..)]
    users: Vec<Uuid>,
}

impl EstimateArgs {
    fn descriptor(self) -> Result<AudienceDescriptor> {
        let descriptor = if self.all {
            AudienceDescriptor::all()
        } else if !self.neighborhoods.is_empty() {
            AudienceDescriptor::neighborhoods(
                self.neighborhoods.into_iter().map(NeighborhoodId::from_uuid),
            )?
        } else {
            AudienceDescriptor::users(self.users.into_iter().map(MemberId::from_uuid))?
        };
        Ok(descriptor)
    }
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct ReconcileLine {
    kind: ContentKind,
    archived: u64,
}

#[derive(Serialize)]
struct EstimateLine {
    #[serde(flatten)]
    audience: AudienceDescriptor,
    estimated_recipients: i64,
}

#[derive(Serialize)]
struct MessageLine<'a> {
    success: bool,
    message: &'a str,
}

fn emit<T: Serialize>(line: &T) -> Result<()> {
    println!("{}", serde_json::to_string(line)?);
    Ok(())
}

fn selected(kind: Option<ContentKind>) -> Vec<ContentKind> {
    kind.map(|k| vec![k]).unwrap_or_else(|| ContentKind::ALL.to_vec())
}

async fn connect() -> Result<BackofficeDeps> {
    let config = Config::from_env().context("Failed to load configuration")?;
    BackofficeDeps::connect(&config).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,backoffice_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate(args) => {
            let policies = Policies::from_env().context("Failed to load configuration")?;
            let audience = args.descriptor()?;
            let estimated_recipients = policies.audience.estimate(&audience);
            emit(&EstimateLine {
                audience,
                estimated_recipients,
            })?;
        }
        Commands::Migrate => {
            let deps = connect().await?;
            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&deps.db_pool)
                .await
                .context("Failed to run migrations")?;
            emit(&MessageLine {
                success: true,
                message: "migrations complete",
            })?;
        }
        Commands::Reconcile { kind } => {
            let deps = connect().await?;
            let now = Utc::now();
            let results = match kind {
                Some(kind) => {
                    let archived = archival::reconcile_expired(kind, now, &deps.db_pool)
                        .await
                        .with_context(|| format!("Failed to reconcile {}", kind.label()))?;
                    vec![(kind, archived)]
                }
                None => archival::reconcile_all(now, &deps.db_pool)
                    .await
                    .context("Failed to reconcile")?,
            };
            for (kind, archived) in results {
                emit(&ReconcileLine { kind, archived })?;
            }
        }
        Commands::Stats { kind } => {
            let deps = connect().await?;
            for kind in selected(kind) {
                let counts = status_counts(kind, &deps)
                    .await
                    .with_context(|| format!("Failed to count {}", kind.label()))?;
                emit(&counts)?;
            }
        }
    }

    Ok(())
}
