use catalog::{
    domain::service::CatalogServiceImpl, inbound::axum_router::CatalogRouterState,
    outbound::pg_catalog_repo::PgCatalogRepo,
};
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<Config>,
    /// Catalog service backed by Postgres
    pub catalog: CatalogRouterState<CatalogServiceImpl<PgCatalogRepo>>,
}
