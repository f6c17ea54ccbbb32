//! One-off job: delete favorites created before authentication existed.
//!
//! Any favorite whose owner was stored as a bare string is removed. Run
//! `migrate-favorites` first, or owned favorites in that shape are lost.

use std::process::ExitCode;

use clap::Parser;

use favorites_sync::{
    config::Config,
    db::{self, PgFavoriteStore},
    services::cleanup_guest_favorites,
    telemetry,
};

#[derive(Parser, Debug)]
#[command(
    name = "cleanup-guest-favorites",
    about = "Delete favorites whose owner predates authentication"
)]
struct Cli {
    /// Count matching favorites without deleting them
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
            tracing::error!(error = %e, "Cleanup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    tracing::info!("Connected to database");

    let store = PgFavoriteStore::new(pool.clone());
    let result = cleanup_guest_favorites(&store, cli.dry_run).await;

    pool.close().await;
    tracing::info!("Database disconnected");

    let report = result?;
    if cli.dry_run {
        println!("Dry run, nothing deleted. {}", report);
    } else {
        println!("{}", report);
    }
    Ok(())
}
