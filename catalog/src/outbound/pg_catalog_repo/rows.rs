use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::prelude::FromRow;

use crate::domain::models::{Category, Product, ProductImage, ProductSummary};

pub(super) const CATEGORY_COLUMNS: &str = r#"
    c.id, c.name, c.description, c.is_active, c.created_at, c.updated_at,
    (SELECT COUNT(*) FROM products cp WHERE cp.category_id = c.id) AS products_count
"#;

pub(super) const PRODUCT_COLUMNS: &str = r#"
    p.id, p.name, p.description, p.price, p.category_id, p.image, p.stock, p.sku,
    p.is_active, p.created_at, p.updated_at
"#;

pub(super) const IMAGE_COLUMNS: &str =
    "i.id, i.product_id, i.image, i.alt_text, i.is_primary, i.created_at";

#[derive(Debug, FromRow)]
pub(super) struct CategoryRow {
    id: i64,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    products_count: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            products_count: row.products_count,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    category_id: i64,
    image: Option<String>,
    stock: i32,
    sku: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category_id: row.category_id,
            image: row.image,
            stock: row.stock,
            sku: row.sku,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ProductSummaryRow {
    id: i64,
    name: String,
    price: Decimal,
    category_name: String,
    image: Option<String>,
    stock: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        ProductSummary {
            id: row.id,
            name: row.name,
            price: row.price,
            category_name: row.category_name,
            image: row.image,
            stock: row.stock,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ImageRow {
    id: i64,
    product_id: i64,
    image: String,
    alt_text: String,
    is_primary: bool,
    created_at: DateTime<Utc>,
}

impl From<ImageRow> for ProductImage {
    fn from(row: ImageRow) -> Self {
        ProductImage {
            id: row.id,
            product_id: row.product_id,
            image: row.image,
            alt_text: row.alt_text,
            is_primary: row.is_primary,
            created_at: row.created_at,
        }
    }
}
