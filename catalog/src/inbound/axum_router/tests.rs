use super::*;
use crate::domain::models::{
    Category, CategoryCount, CategoryFilter, CategoryProducts, CategoryStats, CategoryUpdate,
    CreateProduct, NewCategory, NewProductImage, Product, ProductDetail, ProductFilter,
    ProductImage, ProductSearch, ProductStats, ProductSummary, ProductUpdate, StockUpdate,
};
use axum::{
    body::Body,
    http::{Method, Request},
};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use models_pagination::{Page, PageRequest};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Serves a fixed catalog: category 1 holding product 1, everything else is missing
struct StubCatalog;

fn category() -> Category {
    let ts = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
    Category {
        id: 1,
        name: "Electronics".to_string(),
        description: Some("Gadgets".to_string()),
        is_active: true,
        created_at: ts,
        updated_at: ts,
        products_count: 1,
    }
}

fn product_detail() -> ProductDetail {
    let ts = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
    ProductDetail {
        product: Product {
            id: 1,
            name: "Smart TV 55".to_string(),
            description: "A television".to_string(),
            price: dec!(4500000),
            category_id: 1,
            image: None,
            stock: 3,
            sku: Some("SMARTTV55-20240307-A1B2C3D4".to_string()),
            is_active: true,
            created_at: ts,
            updated_at: ts,
        },
        category: category(),
        additional_images: vec![],
    }
}

fn summary() -> ProductSummary {
    let detail = product_detail();
    ProductSummary {
        id: detail.product.id,
        name: detail.product.name,
        price: detail.product.price,
        category_name: detail.category.name,
        image: None,
        stock: detail.product.stock,
        created_at: detail.product.created_at,
    }
}

fn found(id: i64) -> Result<(), CatalogError> {
    if id == 1 {
        Ok(())
    } else {
        Err(CatalogError::NotFound)
    }
}

impl CatalogService for StubCatalog {
    async fn list_categories(
        &self,
        _filter: CategoryFilter,
        _page: PageRequest,
    ) -> Result<Page<Category>, CatalogError> {
        Ok(Page::new(vec![category()], 1))
    }

    async fn create_category(&self, category_in: NewCategory) -> Result<Category, CatalogError> {
        Ok(Category {
            id: 2,
            name: category_in.name,
            description: category_in.description,
            products_count: 0,
            ..category()
        })
    }

    async fn get_category(&self, id: i64) -> Result<Category, CatalogError> {
        found(id).map(|_| category())
    }

    async fn update_category(
        &self,
        id: i64,
        update: CategoryUpdate,
    ) -> Result<Category, CatalogError> {
        found(id)?;
        let current = category();
        Ok(Category {
            name: update.name.unwrap_or(current.name.clone()),
            description: update.description.unwrap_or(current.description.clone()),
            ..current
        })
    }

    async fn delete_category(&self, id: i64) -> Result<(), CatalogError> {
        found(id)
    }

    async fn category_products(&self, id: i64) -> Result<CategoryProducts, CatalogError> {
        found(id)?;
        Ok(CategoryProducts {
            category: category(),
            products: vec![product_detail()],
        })
    }

    async fn category_stats(&self) -> Result<CategoryStats, CatalogError> {
        Ok(CategoryStats::new(3, 2))
    }

    async fn list_products(
        &self,
        _filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, CatalogError> {
        // pretend there are 25 products, enough for two pages
        let items = if page.page() == 1 {
            vec![summary()]
        } else {
            vec![]
        };
        Ok(Page::new(items, 25))
    }

    async fn create_product(&self, product: CreateProduct) -> Result<ProductDetail, CatalogError> {
        if product.category_id != 1 {
            return Err(CatalogError::Validation {
                field: "category_id",
                message: "The specified category does not exist or is not active.".into(),
            });
        }
        Ok(product_detail())
    }

    async fn get_product(&self, id: i64) -> Result<ProductDetail, CatalogError> {
        found(id).map(|_| product_detail())
    }

    async fn update_product(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> Result<ProductDetail, CatalogError> {
        found(id)?;
        let mut detail = product_detail();
        if let Some(name) = update.name {
            detail.product.name = name;
        }
        if let Some(is_active) = update.is_active {
            detail.product.is_active = is_active;
        }
        Ok(detail)
    }

    async fn delete_product(&self, id: i64) -> Result<(), CatalogError> {
        found(id)
    }

    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<ProductSummary>, CatalogError> {
        if search.query.is_empty() {
            Ok(vec![summary()])
        } else {
            Ok(vec![])
        }
    }

    async fn update_stock(
        &self,
        id: i64,
        update: StockUpdate,
    ) -> Result<ProductDetail, CatalogError> {
        found(id)?;
        let mut detail = product_detail();
        detail.product.stock = update
            .operation
            .apply(detail.product.stock, update.quantity)?;
        Ok(detail)
    }

    async fn product_stats(&self) -> Result<ProductStats, CatalogError> {
        Ok(ProductStats::new(
            2,
            1,
            Some(dec!(12.5)),
            vec![CategoryCount {
                category_name: "Electronics".to_string(),
                count: 2,
            }],
        ))
    }

    async fn list_product_images(&self, product_id: i64) -> Result<Vec<ProductImage>, CatalogError> {
        found(product_id)?;
        Err(CatalogError::Internal(anyhow::anyhow!("storage is down")))
    }

    async fn add_product_image(
        &self,
        product_id: i64,
        image: NewProductImage,
    ) -> Result<ProductImage, CatalogError> {
        found(product_id)?;
        Ok(ProductImage {
            id: 9,
            product_id,
            image: image.image,
            alt_text: image.alt_text,
            is_primary: image.is_primary,
            created_at: Utc.with_ymd_and_hms(2024, 3, 8, 9, 0, 0).unwrap(),
        })
    }
}

fn app() -> Router {
    Router::new().nest("/api", catalog_router(CatalogRouterState::new(StubCatalog)))
}

async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn it_lists_categories_in_the_page_envelope() {
    let (status, body) = send(Method::GET, "/api/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(body["results"][0]["name"], "Electronics");
    assert_eq!(body["results"][0]["products_count"], 1);
}

#[tokio::test]
async fn it_creates_a_category() {
    let (status, body) = send(
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "Books" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 2);
    assert_eq!(body["name"], "Books");
    assert_eq!(body["description"], Value::Null);
}

#[tokio::test]
async fn it_requires_a_category_name() {
    let (status, body) = send(
        Method::POST,
        "/api/categories",
        Some(json!({ "description": "nameless" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "This field is required.", "field": "name" })
    );
}

#[tokio::test]
async fn it_rejects_malformed_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/categories")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn it_requires_the_name_on_put_but_not_patch() {
    let (status, body) = send(
        Method::PUT,
        "/api/categories/1",
        Some(json!({ "description": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");

    let (status, body) = send(
        Method::PATCH,
        "/api/categories/1",
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Electronics");
    assert_eq!(body["description"], Value::Null);
}

#[tokio::test]
async fn it_treats_non_numeric_ids_as_missing() {
    let (status, body) = send(Method::GET, "/api/categories/abc", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found." }));
}

#[tokio::test]
async fn it_returns_not_found_for_unknown_categories() {
    let (status, _) = send(Method::GET, "/api/categories/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(Method::DELETE, "/api/categories/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_deletes_with_no_content() {
    let (status, body) = send(Method::DELETE, "/api/categories/1", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn it_lists_category_products_with_a_count() {
    let (status, body) = send(Method::GET, "/api/categories/1/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"]["id"], 1);
    assert_eq!(body["count"], 1);
    assert_eq!(body["products"][0]["sku"], "SMARTTV55-20240307-A1B2C3D4");
}

#[tokio::test]
async fn it_reports_category_stats() {
    let (status, body) = send(Method::GET, "/api/categories/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "total_categories": 3, "categories_with_products": 2, "empty_categories": 1 })
    );
}

#[tokio::test]
async fn it_links_to_the_next_page_of_products() {
    let (status, body) = send(Method::GET, "/api/products?search=tv", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 25);
    assert_eq!(body["next"], "/api/products?page=2&search=tv");
    assert_eq!(body["previous"], Value::Null);

    let item = &body["results"][0];
    assert_eq!(item["price"], "4500000.00");
    assert_eq!(item["price_display"], "$4,500,000.00");
    assert_eq!(item["category_name"], "Electronics");
    assert_eq!(item["is_in_stock"], true);
}

#[tokio::test]
async fn it_links_back_from_the_last_page() {
    let (status, body) = send(Method::GET, "/api/products?page=2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], "/api/products");
}

#[tokio::test]
async fn it_rejects_pages_past_the_end() {
    for uri in ["/api/products?page=3", "/api/products?page=0", "/api/products?page=x"] {
        let (status, body) = send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "message": "Invalid page." }), "{uri}");
    }
}

#[tokio::test]
async fn it_rejects_unparseable_price_filters() {
    let (status, body) = send(Method::GET, "/api/products?min_price=cheap", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "min_price");
}

#[tokio::test]
async fn it_creates_a_product() {
    let (status, body) = send(
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Smart TV 55",
            "description": "A television",
            "price": "4500000.00",
            "category_id": 1,
            "stock": 3
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["category"]["name"], "Electronics");
    assert_eq!(body["category_id"], 1);
    assert_eq!(body["additional_images"], json!([]));
}

#[tokio::test]
async fn it_surfaces_product_field_errors() {
    let (status, body) = send(
        Method::POST,
        "/api/products",
        Some(json!({
            "name": "Lamp",
            "description": "Bright",
            "price": "10.00",
            "category_id": 7
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "message": "The specified category does not exist or is not active.",
            "field": "category_id"
        })
    );
}

#[tokio::test]
async fn it_requires_core_fields_on_product_put() {
    let (status, body) = send(
        Method::PUT,
        "/api/products/1",
        Some(json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "description");

    let (status, body) = send(
        Method::PATCH,
        "/api/products/1",
        Some(json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
}

#[tokio::test]
async fn it_searches_and_echoes_the_filters() {
    let (status, body) = send(
        Method::GET,
        "/api/products/search?category=elec&min_price=10&in_stock=true",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(
        body["filters"],
        json!({
            "query": "",
            "category": "elec",
            "min_price": "10",
            "max_price": null,
            "in_stock": true
        })
    );
}

#[tokio::test]
async fn it_updates_stock() {
    let (status, body) = send(
        Method::PATCH,
        "/api/products/1/stock",
        Some(json!({ "stock": 2, "operation": "add" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stock updated successfully");
    assert_eq!(body["product"]["stock"], 5);
}

#[tokio::test]
async fn it_reports_insufficient_stock() {
    let (status, body) = send(
        Method::PATCH,
        "/api/products/1/stock",
        Some(json!({ "stock": 10, "operation": "reduce" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Insufficient stock" }));
}

#[tokio::test]
async fn it_rejects_unknown_stock_operations() {
    let (status, body) = send(
        Method::PATCH,
        "/api/products/1/stock",
        Some(json!({ "stock": 1, "operation": "double" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "\"double\" is not a valid choice.", "field": "operation" })
    );
}

#[tokio::test]
async fn it_reports_product_stats() {
    let (status, body) = send(Method::GET, "/api/products/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_products"], 2);
    assert_eq!(body["out_of_stock"], 1);
    assert_eq!(body["average_price"], 12.5);
    assert_eq!(
        body["products_by_category"],
        json!([{ "category__name": "Electronics", "count": 2 }])
    );
}

#[tokio::test]
async fn it_adds_product_images() {
    let (status, body) = send(
        Method::POST,
        "/api/products/1/images",
        Some(json!({ "image": "products/tv-back.jpg", "is_primary": true })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 9);
    assert_eq!(body["alt_text"], "");
    assert_eq!(body["is_primary"], true);
}

#[tokio::test]
async fn it_hides_internal_errors() {
    let (status, body) = send(Method::GET, "/api/products/1/images", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "message": "An internal server error has occurred" })
    );
}

#[tokio::test]
async fn it_deactivates_a_product_with_patch() {
    let (status, body) = send(
        Method::PATCH,
        "/api/products/1",
        Some(json!({ "is_active": false })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn it_rejects_reducing_stock_by_zero() {
    let (status, body) = send(
        Method::PATCH,
        "/api/products/1/stock",
        Some(json!({ "stock": 0, "operation": "reduce" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "stock");
}

#[tokio::test]
async fn it_rejects_stock_additions_past_the_limit() {
    let (status, body) = send(
        Method::PATCH,
        "/api/products/1/stock",
        Some(json!({ "stock": i64::MAX, "operation": "add" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "stock");
}
