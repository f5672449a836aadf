//! Implementation of [CatalogRepo] on top of postgres.

use sqlx::PgPool;

use crate::domain::{
    models::{
        Category, CategoryFilter, CategoryStats, CategoryUpdate, NewCategory, NewProduct,
        NewProductImage, ProductChanges, ProductDetail, ProductFilter, ProductImage, ProductStats,
        ProductSummary, RepoError, UniqueField,
    },
    ports::CatalogRepo,
};
use models_pagination::{Page, PageRequest};

mod categories;
mod images;
mod products;
mod rows;


/// constraint names as declared in the catalog migrations
const CATEGORY_NAME_CONSTRAINT: &str = "categories_name_key";
const SKU_CONSTRAINT: &str = "products_sku_key";

/// The PgCatalogRepo struct is a wrapper around a sqlx::PgPool connected to the catalog database.
#[derive(Clone)]
pub struct PgCatalogRepo {
    pool: PgPool,
}

impl PgCatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        PgCatalogRepo { pool }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        let conflict = e
            .as_database_error()
            .filter(|db| db.is_unique_violation())
            .and_then(|db| match db.constraint() {
                Some(CATEGORY_NAME_CONSTRAINT) => Some(UniqueField::CategoryName),
                Some(SKU_CONSTRAINT) => Some(UniqueField::Sku),
                _ => None,
            });

        match conflict {
            Some(field) => RepoError::Conflict(field),
            None => RepoError::StorageLayerError(e.into()),
        }
    }
}

impl CatalogRepo for PgCatalogRepo {
    #[tracing::instrument(err, skip(self))]
    async fn list_categories(
        &self,
        filter: &CategoryFilter,
        page: PageRequest,
    ) -> Result<Page<Category>, RepoError> {
        Ok(categories::list(&self.pool, filter, page).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn get_category(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(categories::by_id(&self.pool, id, true).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn active_category_name_exists(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, RepoError> {
        Ok(categories::active_name_exists(&self.pool, name, exclude_id).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn create_category(&self, category: &NewCategory) -> Result<Category, RepoError> {
        Ok(categories::insert(&self.pool, category).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryUpdate,
    ) -> Result<Option<Category>, RepoError> {
        Ok(categories::update(&self.pool, id, changes).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn deactivate_category(&self, id: i64) -> Result<bool, RepoError> {
        Ok(categories::deactivate(&self.pool, id).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn category_stats(&self) -> Result<CategoryStats, RepoError> {
        Ok(categories::stats(&self.pool).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn list_category_products(
        &self,
        category_id: i64,
    ) -> Result<Vec<ProductDetail>, RepoError> {
        Ok(products::details_by_category(&self.pool, category_id).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, RepoError> {
        Ok(products::list(&self.pool, filter, page).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductSummary>, RepoError> {
        Ok(products::search(&self.pool, filter).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn get_product(&self, id: i64) -> Result<Option<ProductDetail>, RepoError> {
        Ok(products::detail(&self.pool, id, true).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn get_stored_product(&self, id: i64) -> Result<Option<ProductDetail>, RepoError> {
        Ok(products::detail(&self.pool, id, false).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn sku_exists(&self, sku: &str, exclude_id: Option<i64>) -> Result<bool, RepoError> {
        Ok(products::sku_exists(&self.pool, sku, exclude_id).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn create_product(&self, product: &NewProduct) -> Result<i64, RepoError> {
        Ok(products::insert(&self.pool, product).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn update_product(&self, id: i64, changes: &ProductChanges) -> Result<bool, RepoError> {
        Ok(products::update(&self.pool, id, changes).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn deactivate_product(&self, id: i64) -> Result<bool, RepoError> {
        Ok(products::deactivate(&self.pool, id).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn product_stock(&self, id: i64) -> Result<Option<i32>, RepoError> {
        Ok(products::stock(&self.pool, id).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn update_stock(&self, id: i64, expected: i32, new: i32) -> Result<bool, RepoError> {
        Ok(products::compare_and_set_stock(&self.pool, id, expected, new).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn product_stats(&self) -> Result<ProductStats, RepoError> {
        Ok(products::stats(&self.pool).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn list_product_images(&self, product_id: i64) -> Result<Vec<ProductImage>, RepoError> {
        Ok(images::by_product(&self.pool, product_id).await?)
    }

    #[tracing::instrument(err, skip(self))]
    async fn add_product_image(
        &self,
        product_id: i64,
        image: &NewProductImage,
    ) -> Result<Option<ProductImage>, RepoError> {
        Ok(images::insert(&self.pool, product_id, image).await?)
    }
}
