use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moline_venue::cache::{self, AppCache};
use moline_venue::config::Config;
use moline_venue::pricing::{PgRuleStore, RuleStore};
use moline_venue::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moline_venue=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let store: Arc<dyn RuleStore> = Arc::new(PgRuleStore::new(pool));
    let cache = AppCache::new(config.rule_cache_ttl);

    tokio::spawn(cache::start_cache_warmer(
        cache.clone(),
        store.clone(),
        config.cache_warm_interval,
    ));

    let app = routes::router(AppState::cached(store, cache));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
