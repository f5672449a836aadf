use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use models_pagination::{PageExtractor, PaginatedResponse};

use super::{
    CatalogHandlerErr, CatalogRouterState, ResourceId,
    models::{
        AddProductImageRequest, CreateProductRequest, ProductImageResponse, ProductListItem,
        ProductListParams, ProductResponse, ProductSearchParams,
        ProductSearchResponse, ProductStatsResponse, StockUpdateRequest, StockUpdateResponse,
        UpdateProductRequest,
    },
};
use crate::domain::ports::CatalogService;

/// Lists active products in their compact form
#[utoipa::path(
    get,
    operation_id = "list_products",
    path = "/api/products",
    params(
        ProductListParams,
        ("page" = Option<u32>, Query, description = "1-based page number. Defaults to 1."),
    ),
    responses(
            (status = 200, body=ProductPage),
            (status = 400, body=FieldErrorResponse),
            (status = 404, body=ErrorResponse, description = "Invalid page."),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_products_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    page: PageExtractor,
    Query(params): Query<ProductListParams>,
) -> Result<Json<PaginatedResponse<ProductListItem>>, CatalogHandlerErr>
where
    T: CatalogService,
{
    let products = state
        .service
        .list_products(params.into_filter()?, page.request)
        .await?;

    Ok(Json(page.respond(products.map(ProductListItem::from))?))
}

/// Creates a product, generating its sku when none is given
#[utoipa::path(
    post,
    operation_id = "create_product",
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
            (status = 201, body=ProductResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create_product_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), CatalogHandlerErr>
where
    T: CatalogService,
{
    let Json(req) = payload?;
    let product = state.service.create_product(req.into_domain()?).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Gets an active product with its category and images
#[utoipa::path(
    get,
    operation_id = "get_product",
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
            (status = 200, body=ProductResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_product_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
) -> Result<Json<ProductResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    Ok(Json(state.service.get_product(id).await?.into()))
}

async fn update_product<T>(
    state: CatalogRouterState<T>,
    id: i64,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
    partial: bool,
) -> Result<Json<ProductResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    let Json(req) = payload?;
    let product = state
        .service
        .update_product(id, req.into_domain(partial)?)
        .await?;
    Ok(Json(product.into()))
}

/// Replaces the writable fields of a product.
/// `name`, `description`, `price` and `category_id` are required.
#[utoipa::path(
    put,
    operation_id = "put_product",
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
            (status = 200, body=ProductResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn put_product_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    update_product(state, id, payload, false).await
}

/// Updates any subset of the writable fields of a product
#[utoipa::path(
    patch,
    operation_id = "patch_product",
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
            (status = 200, body=ProductResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn patch_product_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    update_product(state, id, payload, true).await
}

/// Deactivates a product, the row itself is kept
#[utoipa::path(
    delete,
    operation_id = "delete_product",
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
            (status = 204),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_product_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, CatalogHandlerErr>
where
    T: CatalogService,
{
    state.service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Searches active products without pagination
#[utoipa::path(
    get,
    operation_id = "search_products",
    path = "/api/products/search",
    params(ProductSearchParams),
    responses(
            (status = 200, body=ProductSearchResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn search_products_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    Query(params): Query<ProductSearchParams>,
) -> Result<Json<ProductSearchResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    let (search, filters) = params.into_search()?;
    let results: Vec<ProductListItem> = state
        .service
        .search_products(&search)
        .await?
        .into_iter()
        .map(ProductListItem::from)
        .collect();

    Ok(Json(ProductSearchResponse {
        count: results.len(),
        results,
        filters,
    }))
}

/// Adds to, reduces or sets the stock of a product
#[utoipa::path(
    patch,
    operation_id = "update_product_stock",
    path = "/api/products/{id}/stock",
    params(("id" = i64, Path, description = "Product id")),
    request_body = StockUpdateRequest,
    responses(
            (status = 200, body=StockUpdateResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update_stock_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
    payload: Result<Json<StockUpdateRequest>, JsonRejection>,
) -> Result<Json<StockUpdateResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    let Json(req) = payload?;
    let product = state.service.update_stock(id, req.into_domain()?).await?;
    Ok(Json(StockUpdateResponse {
        message: "Stock updated successfully".to_string(),
        product: product.into(),
    }))
}

/// Summarises active products
#[utoipa::path(
    get,
    operation_id = "get_product_stats",
    path = "/api/products/stats",
    responses(
            (status = 200, body=ProductStatsResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn product_stats_handler<T>(
    State(state): State<CatalogRouterState<T>>,
) -> Result<Json<ProductStatsResponse>, CatalogHandlerErr>
where
    T: CatalogService,
{
    Ok(Json(state.service.product_stats().await?.into()))
}

/// Lists the images of an active product, primary image first
#[utoipa::path(
    get,
    operation_id = "list_product_images",
    path = "/api/products/{id}/images",
    params(("id" = i64, Path, description = "Product id")),
    responses(
            (status = 200, body=Vec<ProductImageResponse>),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_product_images_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Vec<ProductImageResponse>>, CatalogHandlerErr>
where
    T: CatalogService,
{
    let images = state.service.list_product_images(id).await?;
    Ok(Json(
        images.into_iter().map(ProductImageResponse::from).collect(),
    ))
}

/// Attaches an image to an active product
#[utoipa::path(
    post,
    operation_id = "add_product_image",
    path = "/api/products/{id}/images",
    params(("id" = i64, Path, description = "Product id")),
    request_body = AddProductImageRequest,
    responses(
            (status = 201, body=ProductImageResponse),
            (status = 400, body=FieldErrorResponse),
            (status = 404, body=ErrorResponse),
            (status = 500, body=ErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn add_product_image_handler<T>(
    State(state): State<CatalogRouterState<T>>,
    ResourceId(id): ResourceId,
    payload: Result<Json<AddProductImageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductImageResponse>), CatalogHandlerErr>
where
    T: CatalogService,
{
    let Json(req) = payload?;
    let image = state
        .service
        .add_product_image(id, req.into_domain()?)
        .await?;
    Ok((StatusCode::CREATED, Json(image.into())))
}
