//! One-off job: create a `like` interaction for every owned favorite.
//!
//! Safe to re-run; favorites that already have an interaction are skipped.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use sqlx::PgPool;

use favorites_sync::{
    config::Config,
    db::{self, PgFavoriteStore, PgInteractionStore},
    services::{migrate_favorites, plan_migration},
    telemetry,
};

#[derive(Parser, Debug)]
#[command(
    name = "migrate-favorites",
    about = "Create like interactions for existing favorites"
)]
struct Cli {
    /// Report what would be created without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Migration failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    tracing::info!("Connected to database");

    let result = execute(&pool, cli).await;

    pool.close().await;
    tracing::info!("Database disconnected");
    result
}

async fn execute(pool: &PgPool, cli: &Cli) -> anyhow::Result<()> {
    let favorites = PgFavoriteStore::new(pool.clone());
    let interactions = PgInteractionStore::new(pool.clone());
    let now = Utc::now();

    if cli.dry_run {
        let plan = plan_migration(&favorites, &interactions, now).await?;
        println!("Dry run, nothing written.\n{}", plan.report);
        return Ok(());
    }

    let report = migrate_favorites(&favorites, &interactions, now).await?;
    println!("{}", report);
    tracing::info!("Migration complete");
    Ok(())
}
