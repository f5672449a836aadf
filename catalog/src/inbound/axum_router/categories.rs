use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use models_pagination::{PageExtractor, PaginatedResponse};

use super::{
    CatalogHandlerErr, CatalogRouterState, ResourceId,
    models::{
        CategoryListParams, CategoryProductsResponse, CategoryResponse,
        CategoryStatsResponse, CreateCategoryRequest, UpdateCategoryRequest,
    },
};
use crate::domain::ports::CatalogService;

/// Lists active categories ordered by name
#[utoipa::path(
    get,
    operation_id = "list_categories",
    path = "/api/categories",
    params(
        CategoryListParams,
        ("page" = Option<u32>, Query, description = "1-based page number. Defaults to 1."),
    ),
    responses(
            (status = 200, body=CategoryPage),
            (status = 404, body=ErrorResponse, description = "Invalid page."),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_categories_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    page: PageExtractor,
    Query(params): Query<CategoryListParams>,
) -> Result<Json<PaginatedResponse<CategoryResponse>>, CatalogHandlerErr>
where
    T: CatalogService,
{
    let categories = state
        .service
        .list_categories(params.into_filter(), page.request)
        .await?;

    Ok(Json(page.respond(categories.map(CategoryResponse::from))?))
}

/// Creates a category
#[utoipa::path(
    post,
    operation_id = "create_category",
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
            (status = 201, body=CategoryResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create_category_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryResponse>), CatalogHandlerErr>
where
    T: CatalogService,
{
    let Json(req) = payload?;
    let category = state.service.create_category(req.into_domain()?).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// Gets an active category
#[utoipa::path(
    get,
    operation_id = "get_category",
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
            (status = 200, body=CategoryResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_category_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
) -> Result<Json<CategoryResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    Ok(Json(state.service.get_category(id).await?.into()))
}

async fn update_category<T>(
    state: CatalogRouterState<T>,
    id: i64,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
    partial: bool,
) -> Result<Json<CategoryResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    let Json(req) = payload?;
    let category = state
        .service
        .update_category(id, req.into_domain(partial)?)
        .await?;
    Ok(Json(category.into()))
}

/// Replaces the writable fields of a category, `name` is required
#[utoipa::path(
    put,
    operation_id = "put_category",
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
            (status = 200, body=CategoryResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn put_category_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<CategoryResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    update_category(state, id, payload, false).await
}

/// Updates any subset of the writable fields of a category
#[utoipa::path(
    patch,
    operation_id = "patch_category",
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
            (status = 200, body=CategoryResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn patch_category_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<CategoryResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    update_category(state, id, payload, true).await
}

/// Deactivates a category, the row itself is kept
#[utoipa::path(
    delete,
    operation_id = "delete_category",
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
            (status = 204),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_category_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, CatalogHandlerErr>
where
    T: CatalogService,
{
    state.service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Gets a category with all of its active products
#[utoipa::path(
    get,
    operation_id = "get_category_products",
    path = "/api/categories/{id}/products",
    params(("id" = i64, Path, description = "Category id")),
    responses(
            (status = 200, body=CategoryProductsResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn category_products_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
) -> Result<Json<CategoryProductsResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    Ok(Json(state.service.category_products(id).await?.into()))
}

/// Counts active categories with and without active products
#[utoipa::path(
    get,
    operation_id = "get_category_stats",
    path = "/api/categories/stats",
    responses(
            (status = 200, body=CategoryStatsResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn category_stats_handler<T>(
    State(state): State<CatalogRouterState<T>>,
) -> Result<Json<CategoryStatsResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    Ok(Json(state.service.category_stats().await?.into()))
}
