use crate::domain::{models::CatalogError, ports::CatalogService};
use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{get, patch},
};
use model_error_response::{ErrorResponse, FieldErrorResponse};
use models_pagination::InvalidPage;
use std::sync::Arc;
use thiserror::Error;

pub mod categories;
pub mod models;
pub mod products;

#[cfg(test)]
mod tests;

pub struct CatalogRouterState<T> {
    service: Arc<T>,
}

impl<T> Clone for CatalogRouterState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T> CatalogRouterState<T>
where
    T: CatalogService,
{
    pub fn new(service: T) -> Self {
        CatalogRouterState {
            service: Arc::new(service),
        }
    }
}

/// Routes for categories and products, relative to wherever the caller nests them
pub fn catalog_router<T, S>(state: CatalogRouterState<T>) -> Router<S>
where
    T: CatalogService,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/categories",
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route("/categories/stats", get(categories::category_stats_handler))
        .route(
            "/categories/:id",
            get(categories::get_category_handler)
                .put(categories::put_category_handler)
                .patch(categories::patch_category_handler)
                .delete(categories::delete_category_handler),
        )
        .route(
            "/categories/:id/products",
            get(categories::category_products_handler),
        )
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route("/products/search", get(products::search_products_handler))
        .route("/products/stats", get(products::product_stats_handler))
        .route(
            "/products/:id",
            get(products::get_product_handler)
                .put(products::put_product_handler)
                .patch(products::patch_product_handler)
                .delete(products::delete_product_handler),
        )
        .route("/products/:id/stock", patch(products::update_stock_handler))
        .route(
            "/products/:id/images",
            get(products::list_product_images_handler).post(products::add_product_image_handler),
        )
        .with_state(state)
}

/// The numeric id of a catalog resource taken from the path.
/// Ids which are not integers cannot name a row, so they are rejected as not found.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = CatalogHandlerErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| CatalogError::NotFound)?;
        Ok(ResourceId(id))
    }
}

#[derive(Debug, Error)]
pub enum CatalogHandlerErr {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    InvalidPage(#[from] InvalidPage),
    #[error("{0}")]
    MalformedBody(String),
}

impl From<JsonRejection> for CatalogHandlerErr {
    fn from(rejection: JsonRejection) -> Self {
        CatalogHandlerErr::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for CatalogHandlerErr {
    fn into_response(self) -> axum::response::Response {
        match self {
            CatalogHandlerErr::Catalog(CatalogError::NotFound) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    message: "Not found.",
                }),
            )
                .into_response(),
            CatalogHandlerErr::Catalog(CatalogError::Validation { field, message }) => (
                StatusCode::BAD_REQUEST,
                Json(FieldErrorResponse {
                    message: &message,
                    field,
                }),
            )
                .into_response(),
            CatalogHandlerErr::Catalog(CatalogError::InsufficientStock) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    message: "Insufficient stock",
                }),
            )
                .into_response(),
            CatalogHandlerErr::Catalog(CatalogError::Internal(e)) => {
                tracing::error!(error=?e, "internal catalog error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        message: "An internal server error has occurred",
                    }),
                )
                    .into_response()
            }
            CatalogHandlerErr::InvalidPage(e) => e.into_response(),
            CatalogHandlerErr::MalformedBody(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { message: &message }),
            )
                .into_response(),
        }
    }
}
