use catalog::inbound::axum_router::{categories, models, products};
use model_error_response::{ErrorResponse, FieldErrorResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories::list_categories_handler,
        categories::create_category_handler,
        categories::get_category_handler,
        categories::put_category_handler,
        categories::patch_category_handler,
        categories::delete_category_handler,
        categories::category_products_handler,
        categories::category_stats_handler,
        // Products
        products::list_products_handler,
        products::create_product_handler,
        products::get_product_handler,
        products::put_product_handler,
        products::patch_product_handler,
        products::delete_product_handler,
        products::search_products_handler,
        products::update_stock_handler,
        products::product_stats_handler,
        // Product images
        products::list_product_images_handler,
        products::add_product_image_handler,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldErrorResponse,
            models::CategoryResponse,
            models::CategoryPage,
            models::CreateCategoryRequest,
            models::UpdateCategoryRequest,
            models::CategoryProductsResponse,
            models::CategoryStatsResponse,
            models::ProductListItem,
            models::ProductPage,
            models::ProductResponse,
            models::CreateProductRequest,
            models::UpdateProductRequest,
            models::ProductSearchResponse,
            models::SearchFilters,
            models::StockUpdateRequest,
            models::StockUpdateResponse,
            models::ProductImageResponse,
            models::AddProductImageRequest,
            models::CategoryCountResponse,
            models::ProductStatsResponse,
        )
    ),
    tags(
        (name = "catalog service", description = "Product catalog service")
    )
)]
pub struct ApiDoc;
