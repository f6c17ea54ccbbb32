use std::sync::Arc;

use favorites_sync::{
    api::{create_router, AppState},
    config::Config,
    db::{self, PgFavoriteStore},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let state = AppState::new(Arc::new(PgFavoriteStore::new(pool)));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Favorites API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
