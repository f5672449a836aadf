use crate::domain::models::{
    CatalogError, Category, CategoryFilter, CategoryProducts, CategoryStats, CategoryUpdate,
    CreateProduct, NewCategory, NewProduct, NewProductImage, ProductChanges, ProductDetail,
    ProductFilter, ProductImage, ProductSearch, ProductStats, ProductSummary, ProductUpdate,
    RepoError, StockUpdate,
};
use models_pagination::{Page, PageRequest};

/// Storage for categories, products and product images.
/// Reads only ever see active rows unless a method says otherwise.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogRepo: Send + Sync + 'static {
    fn list_categories(
        &self,
        filter: &CategoryFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Category>, RepoError>> + Send;

    fn get_category(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Category>, RepoError>> + Send;

    /// true when an active category other than `exclude_id` is called `name`
    fn active_category_name_exists(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> impl Future<Output = Result<bool, RepoError>> + Send;

    fn create_category(
        &self,
        category: &NewCategory,
    ) -> impl Future<Output = Result<Category, RepoError>> + Send;

    /// Apply `changes` to the active category `id`.
    /// Returns the category as stored afterwards, even when the change deactivated it.
    fn update_category(
        &self,
        id: i64,
        changes: &CategoryUpdate,
    ) -> impl Future<Output = Result<Option<Category>, RepoError>> + Send;

    /// soft delete, returns false when no active category matched
    fn deactivate_category(&self, id: i64)
    -> impl Future<Output = Result<bool, RepoError>> + Send;

    fn category_stats(&self) -> impl Future<Output = Result<CategoryStats, RepoError>> + Send;

    /// the active products of a category, fully expanded
    fn list_category_products(
        &self,
        category_id: i64,
    ) -> impl Future<Output = Result<Vec<ProductDetail>, RepoError>> + Send;

    fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ProductSummary>, RepoError>> + Send;

    /// every product matching `filter`, unpaginated
    fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> impl Future<Output = Result<Vec<ProductSummary>, RepoError>> + Send;

    fn get_product(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<ProductDetail>, RepoError>> + Send;

    /// like [CatalogRepo::get_product] but also returns inactive products
    fn get_stored_product(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<ProductDetail>, RepoError>> + Send;

    /// true when a product other than `exclude_id` already uses `sku`, active or not
    fn sku_exists(
        &self,
        sku: &str,
        exclude_id: Option<i64>,
    ) -> impl Future<Output = Result<bool, RepoError>> + Send;

    /// insert a product, returning its id
    fn create_product(
        &self,
        product: &NewProduct,
    ) -> impl Future<Output = Result<i64, RepoError>> + Send;

    /// returns false when no active product matched
    fn update_product(
        &self,
        id: i64,
        changes: &ProductChanges,
    ) -> impl Future<Output = Result<bool, RepoError>> + Send;

    fn deactivate_product(&self, id: i64)
    -> impl Future<Output = Result<bool, RepoError>> + Send;

    /// the current stock of an active product
    fn product_stock(&self, id: i64)
    -> impl Future<Output = Result<Option<i32>, RepoError>> + Send;

    /// Set the stock of an active product to `new` only if it still equals `expected`.
    /// Returns false when the product is gone or its stock changed in the meantime.
    fn update_stock(
        &self,
        id: i64,
        expected: i32,
        new: i32,
    ) -> impl Future<Output = Result<bool, RepoError>> + Send;

    fn product_stats(&self) -> impl Future<Output = Result<ProductStats, RepoError>> + Send;

    fn list_product_images(
        &self,
        product_id: i64,
    ) -> impl Future<Output = Result<Vec<ProductImage>, RepoError>> + Send;

    /// Attach an image to an active product, demoting its other images first when the new
    /// image is primary. Both writes happen in one transaction.
    /// Returns None when no active product matched.
    fn add_product_image(
        &self,
        product_id: i64,
        image: &NewProductImage,
    ) -> impl Future<Output = Result<Option<ProductImage>, RepoError>> + Send;
}

/// The operations the catalog http api exposes
pub trait CatalogService: Send + Sync + 'static {
    fn list_categories(
        &self,
        filter: CategoryFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Category>, CatalogError>> + Send;

    fn create_category(
        &self,
        category: NewCategory,
    ) -> impl Future<Output = Result<Category, CatalogError>> + Send;

    fn get_category(&self, id: i64)
    -> impl Future<Output = Result<Category, CatalogError>> + Send;

    fn update_category(
        &self,
        id: i64,
        update: CategoryUpdate,
    ) -> impl Future<Output = Result<Category, CatalogError>> + Send;

    fn delete_category(&self, id: i64) -> impl Future<Output = Result<(), CatalogError>> + Send;

    fn category_products(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<CategoryProducts, CatalogError>> + Send;

    fn category_stats(&self) -> impl Future<Output = Result<CategoryStats, CatalogError>> + Send;

    fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ProductSummary>, CatalogError>> + Send;

    fn create_product(
        &self,
        product: CreateProduct,
    ) -> impl Future<Output = Result<ProductDetail, CatalogError>> + Send;

    fn get_product(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<ProductDetail, CatalogError>> + Send;

    fn update_product(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> impl Future<Output = Result<ProductDetail, CatalogError>> + Send;

    fn delete_product(&self, id: i64) -> impl Future<Output = Result<(), CatalogError>> + Send;

    fn search_products(
        &self,
        search: &ProductSearch,
    ) -> impl Future<Output = Result<Vec<ProductSummary>, CatalogError>> + Send;

    fn update_stock(
        &self,
        id: i64,
        update: StockUpdate,
    ) -> impl Future<Output = Result<ProductDetail, CatalogError>> + Send;

    fn product_stats(&self) -> impl Future<Output = Result<ProductStats, CatalogError>> + Send;

    fn list_product_images(
        &self,
        product_id: i64,
    ) -> impl Future<Output = Result<Vec<ProductImage>, CatalogError>> + Send;

    fn add_product_image(
        &self,
        product_id: i64,
        image: NewProductImage,
    ) -> impl Future<Output = Result<ProductImage, CatalogError>> + Send;
}
