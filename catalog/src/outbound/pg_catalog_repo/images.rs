use std::collections::HashMap;

use sqlx::PgPool;

use super::rows::{IMAGE_COLUMNS, ImageRow};
use crate::domain::models::{NewProductImage, ProductImage};

pub(super) async fn by_product(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<ProductImage>, sqlx::Error> {
    let rows: Vec<ImageRow> = sqlx::query_as(&format!(
        r#"
        SELECT {IMAGE_COLUMNS} FROM product_images i
        WHERE i.product_id = $1
        ORDER BY i.is_primary DESC, i.created_at ASC, i.id ASC
        "#
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ProductImage::from).collect())
}

/// the images of several products at once, grouped by product id
pub(super) async fn by_products(
    pool: &PgPool,
    product_ids: &[i64],
) -> Result<HashMap<i64, Vec<ProductImage>>, sqlx::Error> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<ImageRow> = sqlx::query_as(&format!(
        r#"
        SELECT {IMAGE_COLUMNS} FROM product_images i
        WHERE i.product_id = ANY($1)
        ORDER BY i.is_primary DESC, i.created_at ASC, i.id ASC
        "#
    ))
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<ProductImage>> = HashMap::new();
    for image in rows.into_iter().map(ProductImage::from) {
        grouped.entry(image.product_id).or_default().push(image);
    }
    Ok(grouped)
}

pub(super) async fn insert(
    pool: &PgPool,
    product_id: i64,
    image: &NewProductImage,
) -> Result<Option<ProductImage>, sqlx::Error> {
    let mut transaction = pool.begin().await?;

    // the row lock serialises concurrent primary image writes for the same product
    let product: Option<i64> =
        sqlx::query_scalar("SELECT id FROM products WHERE id = $1 AND is_active FOR UPDATE")
            .bind(product_id)
            .fetch_optional(&mut *transaction)
            .await?;

    if product.is_none() {
        return Ok(None);
    }

    if image.is_primary {
        sqlx::query(
            "UPDATE product_images SET is_primary = FALSE WHERE product_id = $1 AND is_primary",
        )
        .bind(product_id)
        .execute(&mut *transaction)
        .await?;
    }

    let row: ImageRow = sqlx::query_as(&format!(
        r#"
        WITH i AS (
            INSERT INTO product_images (product_id, image, alt_text, is_primary)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT {IMAGE_COLUMNS} FROM i
        "#
    ))
    .bind(product_id)
    .bind(&image.image)
    .bind(&image.alt_text)
    .bind(image.is_primary)
    .fetch_one(&mut *transaction)
    .await?;

    transaction.commit().await?;

    Ok(Some(row.into()))
}
