use sqlx::{PgPool, Postgres, QueryBuilder};

use super::rows::{CATEGORY_COLUMNS, CategoryRow};
use crate::domain::models::{
    Category, CategoryFilter, CategoryStats, CategoryUpdate, NewCategory, contains_pattern,
};
use models_pagination::{Page, PageRequest};

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CategoryFilter) {
    builder.push(" WHERE c.is_active");
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        builder
            .push(" AND (c.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub(super) async fn list(
    pool: &PgPool,
    filter: &CategoryFilter,
    page: PageRequest,
) -> Result<Page<Category>, sqlx::Error> {
    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM categories c");
    push_filter(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut query = QueryBuilder::new(format!("SELECT {CATEGORY_COLUMNS} FROM categories c"));
    push_filter(&mut query, filter);
    query
        .push(" ORDER BY c.name, c.id LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows: Vec<CategoryRow> = query.build_query_as().fetch_all(pool).await?;

    Ok(Page::new(rows, total).map(Category::from))
}

/// fetch a category, restricted to active ones when `active_only`
pub(super) async fn by_id(
    pool: &PgPool,
    id: i64,
    active_only: bool,
) -> Result<Option<Category>, sqlx::Error> {
    let row: Option<CategoryRow> = sqlx::query_as(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories c WHERE c.id = $1 AND (c.is_active OR NOT $2)"
    ))
    .bind(id)
    .bind(active_only)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Category::from))
}

pub(super) async fn active_name_exists(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM categories
            WHERE name = $1 AND is_active AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

pub(super) async fn insert(pool: &PgPool, category: &NewCategory) -> Result<Category, sqlx::Error> {
    let row: CategoryRow = sqlx::query_as(&format!(
        r#"
        WITH c AS (
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING *
        )
        SELECT {CATEGORY_COLUMNS} FROM c
        "#
    ))
    .bind(&category.name)
    .bind(&category.description)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

pub(super) async fn update(
    pool: &PgPool,
    id: i64,
    changes: &CategoryUpdate,
) -> Result<Option<Category>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE categories SET updated_at = NOW()");
    if let Some(name) = &changes.name {
        builder.push(", name = ").push_bind(name.clone());
    }
    if let Some(description) = &changes.description {
        builder
            .push(", description = ")
            .push_bind(description.clone());
    }
    if let Some(is_active) = changes.is_active {
        builder.push(", is_active = ").push_bind(is_active);
    }
    builder
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND is_active RETURNING id");

    let updated: Option<i64> = builder.build_query_scalar().fetch_optional(pool).await?;

    match updated {
        Some(id) => by_id(pool, id, false).await,
        None => Ok(None),
    }
}

pub(super) async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("UPDATE categories SET is_active = FALSE WHERE id = $1 AND is_active")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(res.rows_affected() > 0)
}

pub(super) async fn stats(pool: &PgPool) -> Result<CategoryStats, sqlx::Error> {
    let (total, with_products): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (
                WHERE EXISTS (
                    SELECT 1 FROM products p WHERE p.category_id = c.id AND p.is_active
                )
            ) AS with_products
        FROM categories c
        WHERE c.is_active
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(CategoryStats::new(total, with_products))
}
