use crate::domain::{
    models::{
        CATEGORY_NAME_TAKEN, CatalogError, Category, CategoryFilter, CategoryProducts,
        CategoryStats, CategoryUpdate, CreateProduct, NewCategory, NewProductImage, ProductDetail,
        ProductFilter, ProductImage, ProductSearch, ProductStats, ProductSummary, ProductUpdate,
        SKU_TAKEN, StockUpdate, new_sku,
    },
    ports::{CatalogRepo, CatalogService},
};
use models_pagination::{Page, PageRequest};


/// attempts at a stock compare-and-set before giving up on a contended product
const STOCK_UPDATE_ATTEMPTS: usize = 3;

/// struct which implements the catalog rules on top of an abstract storage layer
pub struct CatalogServiceImpl<R> {
    repo: R,
}

impl<R> CatalogServiceImpl<R>
where
    R: CatalogRepo,
{
    pub fn new(repo: R) -> Self {
        CatalogServiceImpl { repo }
    }

    async fn active_category(&self, id: i64) -> Result<Category, CatalogError> {
        self.repo.get_category(id).await?.ok_or(CatalogError::NotFound)
    }

    async fn active_product(&self, id: i64) -> Result<ProductDetail, CatalogError> {
        self.repo.get_product(id).await?.ok_or(CatalogError::NotFound)
    }

    /// a product may only be filed under a category which exists and is active
    async fn ensure_category_assignable(&self, category_id: i64) -> Result<(), CatalogError> {
        match self.repo.get_category(category_id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::invalid(
                "category_id",
                "The specified category does not exist or is not active.",
            )),
        }
    }

    /// re-read a product the service just wrote
    async fn reload_product(&self, id: i64) -> Result<ProductDetail, CatalogError> {
        self.repo.get_product(id).await?.ok_or_else(|| {
            CatalogError::Internal(anyhow::anyhow!("product {id} vanished after write"))
        })
    }
}

impl<R> CatalogService for CatalogServiceImpl<R>
where
    R: CatalogRepo,
{
    #[tracing::instrument(skip(self))]
    async fn list_categories(
        &self,
        filter: CategoryFilter,
        page: PageRequest,
    ) -> Result<Page<Category>, CatalogError> {
        Ok(self.repo.list_categories(&filter, page).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn create_category(&self, category: NewCategory) -> Result<Category, CatalogError> {
        let category = category.validate()?;

        if self
            .repo
            .active_category_name_exists(&category.name, None)
            .await?
        {
            return Err(CatalogError::invalid("name", CATEGORY_NAME_TAKEN));
        }

        let created = self.repo.create_category(&category).await?;
        tracing::info!(category_id = created.id, "created category");
        Ok(created)
    }

    #[tracing::instrument(skip(self))]
    async fn get_category(&self, id: i64) -> Result<Category, CatalogError> {
        self.active_category(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_category(
        &self,
        id: i64,
        update: CategoryUpdate,
    ) -> Result<Category, CatalogError> {
        let current = self.active_category(id).await?;
        let update = update.validate()?;

        if let Some(name) = update.name.as_deref().filter(|name| *name != current.name) {
            if self.repo.active_category_name_exists(name, Some(id)).await? {
                return Err(CatalogError::invalid("name", CATEGORY_NAME_TAKEN));
            }
        }

        let updated = self
            .repo
            .update_category(id, &update)
            .await?
            .ok_or(CatalogError::NotFound)?;
        tracing::info!(category_id = id, "updated category");
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_category(&self, id: i64) -> Result<(), CatalogError> {
        if !self.repo.deactivate_category(id).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(category_id = id, "deactivated category");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn category_products(&self, id: i64) -> Result<CategoryProducts, CatalogError> {
        let category = self.active_category(id).await?;
        let products = self.repo.list_category_products(id).await?;
        Ok(CategoryProducts { category, products })
    }

    #[tracing::instrument(skip(self))]
    async fn category_stats(&self) -> Result<CategoryStats, CatalogError> {
        Ok(self.repo.category_stats().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<ProductSummary>, CatalogError> {
        Ok(self.repo.list_products(&filter, page).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn create_product(&self, product: CreateProduct) -> Result<ProductDetail, CatalogError> {
        let product = product.validate()?;
        self.ensure_category_assignable(product.category_id).await?;

        let sku = match product.sku.clone() {
            Some(sku) => {
                if self.repo.sku_exists(&sku, None).await? {
                    return Err(CatalogError::invalid("sku", SKU_TAKEN));
                }
                sku
            }
            None => new_sku(&product.name),
        };

        let id = self.repo.create_product(&product.with_sku(sku)).await?;
        tracing::info!(product_id = id, "created product");
        self.reload_product(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_product(&self, id: i64) -> Result<ProductDetail, CatalogError> {
        self.active_product(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_product(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> Result<ProductDetail, CatalogError> {
        self.active_product(id).await?;
        let changes = update.validate()?;

        if let Some(category_id) = changes.category_id {
            self.ensure_category_assignable(category_id).await?;
        }

        if !self.repo.update_product(id, &changes).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(product_id = id, "updated product");
        // the update may have deactivated the product
        self.repo.get_stored_product(id).await?.ok_or_else(|| {
            CatalogError::Internal(anyhow::anyhow!("product {id} vanished after write"))
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product(&self, id: i64) -> Result<(), CatalogError> {
        if !self.repo.deactivate_product(id).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(product_id = id, "deactivated product");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn search_products(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<ProductSummary>, CatalogError> {
        Ok(self.repo.search_products(&search.to_filter()).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn update_stock(
        &self,
        id: i64,
        update: StockUpdate,
    ) -> Result<ProductDetail, CatalogError> {
        for _ in 0..STOCK_UPDATE_ATTEMPTS {
            let current = self
                .repo
                .product_stock(id)
                .await?
                .ok_or(CatalogError::NotFound)?;

            let next = update.operation.apply(current, update.quantity)?;

            if self.repo.update_stock(id, current, next).await? {
                tracing::info!(product_id = id, from = current, to = next, "updated stock");
                return self.reload_product(id).await;
            }
            tracing::debug!(product_id = id, "stock changed concurrently, retrying");
        }

        Err(CatalogError::Internal(anyhow::anyhow!(
            "stock of product {id} kept changing concurrently"
        )))
    }

    #[tracing::instrument(skip(self))]
    async fn product_stats(&self) -> Result<ProductStats, CatalogError> {
        Ok(self.repo.product_stats().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_product_images(&self, product_id: i64) -> Result<Vec<ProductImage>, CatalogError> {
        if self.repo.product_stock(product_id).await?.is_none() {
            return Err(CatalogError::NotFound);
        }
        Ok(self.repo.list_product_images(product_id).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn add_product_image(
        &self,
        product_id: i64,
        image: NewProductImage,
    ) -> Result<ProductImage, CatalogError> {
        let image = image.validate()?;
        let created = self
            .repo
            .add_product_image(product_id, &image)
            .await?
            .ok_or(CatalogError::NotFound)?;
        tracing::info!(product_id, image_id = created.id, "added product image");
        Ok(created)
    }
}
