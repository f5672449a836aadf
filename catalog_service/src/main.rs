use crate::api::context::ApiContext;
use anyhow::Context;
use catalog::{
    domain::service::CatalogServiceImpl, inbound::axum_router::CatalogRouterState,
    outbound::pg_catalog_repo::PgCatalogRepo,
};
use catalog_db_migrator::CATALOG_DB_MIGRATIONS;
use catalog_entrypoint::CatalogEntrypoint;
use config::Config;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

mod api;
mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    CatalogEntrypoint::default().init();

    let config = Config::from_env().context("expected to be able to generate config")?;

    tracing::info!(environment = %config.environment, "initialized config");

    let (min_connections, max_connections) = config.environment.pool_size();

    let db = PgPoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .connect(&config.database_url)
        .await
        .context("could not connect to the catalog database")?;

    tracing::info!(
        min_connections,
        max_connections,
        "initialized catalog db connection"
    );

    if config.run_migrations {
        CATALOG_DB_MIGRATIONS
            .run(&db)
            .await
            .context("failed to apply catalog migrations")?;
        tracing::info!("applied catalog migrations");
    }

    let catalog = CatalogRouterState::new(CatalogServiceImpl::new(PgCatalogRepo::new(db)));

    api::setup_and_serve(ApiContext {
        config: Arc::new(config),
        catalog,
    })
    .await?;
    Ok(())
}
