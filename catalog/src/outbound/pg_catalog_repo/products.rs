use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{
    categories,
    images,
    rows::{PRODUCT_COLUMNS, ProductRow, ProductSummaryRow},
};
use crate::domain::models::{
    CategoryCount, NewProduct, Product, ProductChanges, ProductDetail, ProductFilter,
    ProductOrderField, ProductStats, ProductSummary, contains_pattern,
};
use models_pagination::{Page, PageRequest};

static SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.name, p.price, c.name AS category_name, p.image, p.stock, p.created_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

static COUNT_SELECT: &str = r#"
    SELECT COUNT(*)
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

fn order_column(field: ProductOrderField) -> &'static str {
    match field {
        ProductOrderField::Name => "p.name",
        ProductOrderField::Price => "p.price",
        ProductOrderField::CreatedAt => "p.created_at",
        ProductOrderField::Stock => "p.stock",
    }
}

/// translate every present filter into a `WHERE` clause conjunct
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE p.is_active");

    for term in &filter.search_terms {
        let pattern = contains_pattern(term);
        builder
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.sku ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category_name) = &filter.category_name {
        builder
            .push(" AND c.name ILIKE ")
            .push_bind(contains_pattern(category_name));
    }
    if let Some(category_id) = filter.category_id {
        builder.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(is_active) = filter.is_active {
        builder.push(" AND p.is_active = ").push_bind(is_active);
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND p.price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND p.price <= ").push_bind(max_price);
    }
    if filter.in_stock {
        builder.push(" AND p.stock > 0");
    }
}

fn push_ordering(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" ORDER BY ");
    for ordering in &filter.ordering {
        builder.push(order_column(ordering.field));
        builder.push(if ordering.descending { " DESC, " } else { " ASC, " });
    }
    builder.push("p.id ASC");
}

pub(super) async fn list(
    pool: &PgPool,
    filter: &ProductFilter,
    page: PageRequest,
) -> Result<Page<ProductSummary>, sqlx::Error> {
    let mut count = QueryBuilder::new(COUNT_SELECT);
    push_filter(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut query = QueryBuilder::new(SUMMARY_SELECT);
    push_filter(&mut query, filter);
    push_ordering(&mut query, filter);
    query
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows: Vec<ProductSummaryRow> = query.build_query_as().fetch_all(pool).await?;

    Ok(Page::new(rows, total).map(ProductSummary::from))
}

pub(super) async fn search(
    pool: &PgPool,
    filter: &ProductFilter,
) -> Result<Vec<ProductSummary>, sqlx::Error> {
    let mut query = QueryBuilder::new(SUMMARY_SELECT);
    push_filter(&mut query, filter);
    push_ordering(&mut query, filter);

    let rows: Vec<ProductSummaryRow> = query.build_query_as().fetch_all(pool).await?;

    Ok(rows.into_iter().map(ProductSummary::from).collect())
}

pub(super) async fn detail(
    pool: &PgPool,
    id: i64,
    active_only: bool,
) -> Result<Option<ProductDetail>, sqlx::Error> {
    let row: Option<ProductRow> = sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1 AND (p.is_active OR NOT $2)"
    ))
    .bind(id)
    .bind(active_only)
    .fetch_optional(pool)
    .await?;

    let Some(product) = row.map(Product::from) else {
        return Ok(None);
    };

    // the category is shown even once it has been deactivated
    let Some(category) = categories::by_id(pool, product.category_id, false).await? else {
        return Err(sqlx::Error::RowNotFound);
    };
    let additional_images = images::by_product(pool, product.id).await?;

    Ok(Some(ProductDetail {
        product,
        category,
        additional_images,
    }))
}

pub(super) async fn details_by_category(
    pool: &PgPool,
    category_id: i64,
) -> Result<Vec<ProductDetail>, sqlx::Error> {
    let Some(category) = categories::by_id(pool, category_id, false).await? else {
        return Ok(vec![]);
    };

    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS} FROM products p
        WHERE p.category_id = $1 AND p.is_active
        ORDER BY p.created_at DESC, p.id ASC
        "#
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    let products: Vec<Product> = rows.into_iter().map(Product::from).collect();
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let mut images_by_product = images::by_products(pool, &ids).await?;

    Ok(products
        .into_iter()
        .map(|product| ProductDetail {
            additional_images: images_by_product.remove(&product.id).unwrap_or_default(),
            category: category.clone(),
            product,
        })
        .collect())
}

pub(super) async fn sku_exists(
    pool: &PgPool,
    sku: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM products WHERE sku = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(sku)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

pub(super) async fn insert(pool: &PgPool, product: &NewProduct) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO products (name, description, price, category_id, image, stock, sku)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.category_id)
    .bind(&product.image)
    .bind(product.stock)
    .bind(&product.sku)
    .fetch_one(pool)
    .await
}

pub(super) async fn update(
    pool: &PgPool,
    id: i64,
    changes: &ProductChanges,
) -> Result<bool, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = NOW()");
    if let Some(name) = &changes.name {
        builder.push(", name = ").push_bind(name.clone());
    }
    if let Some(description) = &changes.description {
        builder
            .push(", description = ")
            .push_bind(description.clone());
    }
    if let Some(price) = changes.price {
        builder.push(", price = ").push_bind(price);
    }
    if let Some(category_id) = changes.category_id {
        builder.push(", category_id = ").push_bind(category_id);
    }
    if let Some(image) = &changes.image {
        builder.push(", image = ").push_bind(image.clone());
    }
    if let Some(stock) = changes.stock {
        builder.push(", stock = ").push_bind(stock);
    }
    if let Some(is_active) = changes.is_active {
        builder.push(", is_active = ").push_bind(is_active);
    }
    builder
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND is_active");

    let res = builder.build().execute(pool).await?;
    Ok(res.rows_affected() > 0)
}

pub(super) async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("UPDATE products SET is_active = FALSE WHERE id = $1 AND is_active")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(res.rows_affected() > 0)
}

pub(super) async fn stock(pool: &PgPool, id: i64) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1 AND is_active")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(super) async fn compare_and_set_stock(
    pool: &PgPool,
    id: i64,
    expected: i32,
    new: i32,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE products SET stock = $3 WHERE id = $1 AND is_active AND stock = $2",
    )
    .bind(id)
    .bind(expected)
    .bind(new)
    .execute(pool)
    .await?;

    Ok(res.rows_affected() > 0)
}

pub(super) async fn stats(pool: &PgPool) -> Result<ProductStats, sqlx::Error> {
    let (total, in_stock, average): (i64, i64, Option<Decimal>) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE stock > 0) AS in_stock,
            ROUND(AVG(price), 2) AS average_price
        FROM products
        WHERE is_active
        "#,
    )
    .fetch_one(pool)
    .await?;

    let by_category: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT c.name, COUNT(p.id) AS count
        FROM products p
        JOIN categories c ON c.id = p.category_id
        WHERE p.is_active
        GROUP BY c.name
        ORDER BY count DESC, c.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(ProductStats::new(
        total,
        in_stock,
        average,
        by_category
            .into_iter()
            .map(|(category_name, count)| CategoryCount {
                category_name,
                count,
            })
            .collect(),
    ))
}
