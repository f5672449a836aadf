//! Request and response shapes of the catalog http api.
//! Every verb has its own shape: compact list rows, rich detail bodies and narrow write bodies.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::models::{
    CatalogError, Category, CategoryCount, CategoryFilter, CategoryProducts, CategoryStats,
    CategoryUpdate, CreateProduct, NewCategory, NewProductImage, ProductDetail, ProductFilter,
    ProductImage, ProductOrdering, ProductSearch, ProductStats, ProductSummary, ProductUpdate,
    StockOperation, StockUpdate, split_search_terms, to_cents_scale,
};

/// Distinguish an absent field from an explicit `null`
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, CatalogError> {
    value.ok_or_else(|| CatalogError::required(field))
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_query_value<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
    message: &'static str,
) -> Result<Option<T>, CatalogError> {
    non_empty(raw)
        .map(|s| s.parse::<T>().map_err(|_| CatalogError::invalid(field, message)))
        .transpose()
}

fn parse_price_bound(field: &'static str, raw: Option<&str>) -> Result<Option<Decimal>, CatalogError> {
    parse_query_value(field, raw, "A valid number is required.")
}

fn parse_bool(field: &'static str, raw: Option<&str>) -> Result<Option<bool>, CatalogError> {
    match non_empty(raw).map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "1") => Ok(Some(true)),
        Some("false" | "0") => Ok(Some(false)),
        Some(_) => Err(CatalogError::invalid(field, "Must be a valid boolean.")),
    }
}

/// only a case-insensitive `true` enables the stock filter, anything else is ignored
fn in_stock_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| s.trim().eq_ignore_ascii_case("true"))
}

// ----- categories -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryListParams {
    /// Case-insensitive substring of the name or description.
    #[serde(default)]
    pub search: Option<String>,
}

impl CategoryListParams {
    pub fn into_filter(self) -> CategoryFilter {
        CategoryFilter {
            search: non_empty(self.search.as_deref()).map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Unique among active categories, at most 100 characters.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub fn into_domain(self) -> Result<NewCategory, CatalogError> {
        Ok(NewCategory {
            name: required("name", self.name)?,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    /// Required on PUT.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateCategoryRequest {
    pub fn into_domain(self, partial: bool) -> Result<CategoryUpdate, CatalogError> {
        if !partial && self.name.is_none() {
            return Err(CatalogError::required("name"));
        }
        Ok(CategoryUpdate {
            name: self.name,
            description: self.description,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Products filed under this category, active or not.
    pub products_count: i64,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        CategoryResponse {
            id: category.id,
            name: category.name,
            description: category.description,
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
            products_count: category.products_count,
        }
    }
}

/// A page of categories, only used to document the paginated envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPage {
    count: i64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryProductsResponse {
    pub category: CategoryResponse,
    pub products: Vec<ProductResponse>,
    pub count: usize,
}

impl From<CategoryProducts> for CategoryProductsResponse {
    fn from(value: CategoryProducts) -> Self {
        let products: Vec<ProductResponse> =
            value.products.into_iter().map(ProductResponse::from).collect();
        CategoryProductsResponse {
            category: value.category.into(),
            count: products.len(),
            products,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryStatsResponse {
    pub total_categories: i64,
    pub categories_with_products: i64,
    pub empty_categories: i64,
}

impl From<CategoryStats> for CategoryStatsResponse {
    fn from(stats: CategoryStats) -> Self {
        CategoryStatsResponse {
            total_categories: stats.total_categories,
            categories_with_products: stats.categories_with_products,
            empty_categories: stats.empty_categories,
        }
    }
}

// ----- products -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// Terms separated by spaces or commas. Every term must match the name, description or sku.
    #[serde(default)]
    pub search: Option<String>,
    /// Case-insensitive substring of the category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Exact category id.
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<String>,
    /// `true` keeps only products with stock.
    #[serde(default)]
    pub in_stock: Option<String>,
    /// Comma separated list of name, price, created_at and stock. Prefix with `-` to descend.
    #[serde(default)]
    pub ordering: Option<String>,
}

impl ProductListParams {
    pub fn into_filter(self) -> Result<ProductFilter, CatalogError> {
        Ok(ProductFilter {
            search_terms: self
                .search
                .as_deref()
                .map(split_search_terms)
                .unwrap_or_default(),
            category_name: non_empty(self.category.as_deref()).map(str::to_string),
            category_id: parse_query_value(
                "category_id",
                self.category_id.as_deref(),
                "A valid integer is required.",
            )?,
            is_active: parse_bool("is_active", self.is_active.as_deref())?,
            min_price: parse_price_bound("min_price", self.min_price.as_deref())?,
            max_price: parse_price_bound("max_price", self.max_price.as_deref())?,
            in_stock: in_stock_flag(self.in_stock.as_deref()),
            ordering: ProductOrdering::parse_list(self.ordering.as_deref()),
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchParams {
    /// Case-insensitive substring of the name, description or sku, matched as one term.
    #[serde(default)]
    pub q: Option<String>,
    /// Case-insensitive substring of the category name.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    /// `true` keeps only products with stock.
    #[serde(default)]
    pub in_stock: Option<String>,
}

impl ProductSearchParams {
    /// parse into the domain search and the echo of the filters that were applied
    pub fn into_search(self) -> Result<(ProductSearch, SearchFilters), CatalogError> {
        let search = ProductSearch {
            query: self.q.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            min_price: parse_price_bound("min_price", self.min_price.as_deref())?,
            max_price: parse_price_bound("max_price", self.max_price.as_deref())?,
            in_stock: in_stock_flag(self.in_stock.as_deref()),
        };
        let echo = SearchFilters {
            query: self.q.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock: search.in_stock,
        };
        Ok((search, echo))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchFilters {
    pub query: String,
    pub category: String,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub in_stock: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSearchResponse {
    pub results: Vec<ProductListItem>,
    pub count: usize,
    pub filters: SearchFilters,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Positive, at most 8 integer digits and 2 decimal places.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    /// Must reference an active category.
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    /// Generated from the name and date when absent.
    #[serde(default)]
    pub sku: Option<String>,
}

impl CreateProductRequest {
    pub fn into_domain(self) -> Result<CreateProduct, CatalogError> {
        Ok(CreateProduct {
            name: required("name", self.name)?,
            description: required("description", self.description)?,
            price: required("price", self.price)?,
            category_id: required("category_id", self.category_id)?,
            image: self.image,
            stock: self.stock,
            sku: self.sku,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub image: Option<Option<String>>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    /// PUT requires the same core fields as a create, PATCH accepts any subset
    pub fn into_domain(self, partial: bool) -> Result<ProductUpdate, CatalogError> {
        if !partial {
            required("name", self.name.as_ref())?;
            required("description", self.description.as_ref())?;
            required("price", self.price.as_ref())?;
            required("category_id", self.category_id.as_ref())?;
        }
        Ok(ProductUpdate {
            name: self.name,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
            image: self.image,
            stock: self.stock,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockUpdateRequest {
    /// Quantity to add, remove or set. Must not be negative.
    #[serde(default)]
    pub stock: Option<i64>,
    /// One of `add`, `reduce` or `set`.
    #[serde(default)]
    pub operation: Option<String>,
}

impl StockUpdateRequest {
    pub fn into_domain(self) -> Result<StockUpdate, CatalogError> {
        let quantity = required("stock", self.stock)?;
        let raw = required("operation", self.operation)?;
        let operation = raw.parse::<StockOperation>().map_err(|_| {
            CatalogError::invalid("operation", format!("\"{raw}\" is not a valid choice."))
        })?;
        Ok(StockUpdate {
            operation,
            quantity,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockUpdateResponse {
    pub message: String,
    pub product: ProductResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProductImageRequest {
    /// Stored path or url of the image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Demotes every other image of the product when set.
    #[serde(default)]
    pub is_primary: Option<bool>,
}

impl AddProductImageRequest {
    pub fn into_domain(self) -> Result<NewProductImage, CatalogError> {
        Ok(NewProductImage {
            image: required("image", self.image)?,
            alt_text: self.alt_text.unwrap_or_default(),
            is_primary: self.is_primary.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductImageResponse {
    pub id: i64,
    pub image: String,
    pub alt_text: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ProductImage> for ProductImageResponse {
    fn from(image: ProductImage) -> Self {
        ProductImageResponse {
            id: image.id,
            image: image.image,
            alt_text: image.alt_text,
            is_primary: image.is_primary,
            created_at: image.created_at,
        }
    }
}

/// The compact product shape used by listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListItem {
    pub id: i64,
    pub name: String,
    #[schema(value_type = String, example = "4500000.00")]
    pub price: Decimal,
    #[schema(example = "$4,500,000.00")]
    pub price_display: String,
    pub category_name: String,
    pub image: Option<String>,
    pub stock: i32,
    pub is_in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ProductSummary> for ProductListItem {
    fn from(product: ProductSummary) -> Self {
        ProductListItem {
            price_display: product.price_display(),
            is_in_stock: product.is_in_stock(),
            id: product.id,
            name: product.name,
            price: to_cents_scale(product.price),
            category_name: product.category_name,
            image: product.image,
            stock: product.stock,
            created_at: product.created_at,
        }
    }
}

/// A page of products, only used to document the paginated envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    count: i64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<ProductListItem>,
}

/// The full product shape with its category and additional images
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "4500000.00")]
    pub price: Decimal,
    #[schema(example = "$4,500,000.00")]
    pub price_display: String,
    pub category: CategoryResponse,
    pub category_id: i64,
    pub image: Option<String>,
    pub additional_images: Vec<ProductImageResponse>,
    pub stock: i32,
    pub sku: Option<String>,
    pub is_active: bool,
    pub is_in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductDetail> for ProductResponse {
    fn from(detail: ProductDetail) -> Self {
        let ProductDetail {
            product,
            category,
            additional_images,
        } = detail;

        ProductResponse {
            price_display: product.price_display(),
            is_in_stock: product.is_in_stock(),
            id: product.id,
            name: product.name,
            description: product.description,
            price: to_cents_scale(product.price),
            category: category.into(),
            category_id: product.category_id,
            image: product.image,
            additional_images: additional_images
                .into_iter()
                .map(ProductImageResponse::from)
                .collect(),
            stock: product.stock,
            sku: product.sku,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryCountResponse {
    #[serde(rename = "category__name")]
    pub category_name: String,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountResponse {
    fn from(value: CategoryCount) -> Self {
        CategoryCountResponse {
            category_name: value.category_name,
            count: value.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductStatsResponse {
    pub total_products: i64,
    pub products_in_stock: i64,
    pub out_of_stock: i64,
    pub average_price: f64,
    pub products_by_category: Vec<CategoryCountResponse>,
}

impl From<ProductStats> for ProductStatsResponse {
    fn from(stats: ProductStats) -> Self {
        ProductStatsResponse {
            total_products: stats.total_products,
            products_in_stock: stats.products_in_stock,
            out_of_stock: stats.out_of_stock,
            average_price: stats.average_price,
            products_by_category: stats
                .products_by_category
                .into_iter()
                .map(CategoryCountResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_distinguishes_null_from_absent() {
        let absent: UpdateProductRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.image, None);

        let cleared: UpdateProductRequest = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(cleared.image, Some(None));

        let set: UpdateProductRequest =
            serde_json::from_str(r#"{"image": "products/a.jpg"}"#).unwrap();
        assert_eq!(set.image, Some(Some("products/a.jpg".to_string())));
    }

    #[test]
    fn it_requires_core_fields_on_put() {
        let req: UpdateProductRequest = serde_json::from_str(r#"{"name": "TV"}"#).unwrap();
        assert!(matches!(
            req.into_domain(false),
            Err(CatalogError::Validation {
                field: "description",
                ..
            })
        ));

        let req: UpdateProductRequest = serde_json::from_str(r#"{"name": "TV"}"#).unwrap();
        assert_eq!(req.into_domain(true).unwrap().name.as_deref(), Some("TV"));
    }

    #[test]
    fn it_accepts_prices_as_numbers_or_strings() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"price": "19.99", "name": "a"}"#).unwrap();
        assert_eq!(req.price, Some(Decimal::new(1999, 2)));

        let req: CreateProductRequest = serde_json::from_str(r#"{"price": 20}"#).unwrap();
        assert_eq!(req.price, Some(Decimal::from(20)));
    }

    #[test]
    fn it_parses_list_params() {
        let filter = ProductListParams {
            search: Some("smart, tv".to_string()),
            category_id: Some("3".to_string()),
            is_active: Some("True".to_string()),
            min_price: Some(" 10.5 ".to_string()),
            in_stock: Some("TRUE".to_string()),
            ordering: Some("-price".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.search_terms, vec!["smart", "tv"]);
        assert_eq!(filter.category_id, Some(3));
        assert_eq!(filter.is_active, Some(true));
        assert_eq!(filter.min_price, Some(Decimal::new(105, 1)));
        assert!(filter.in_stock);
        assert!(filter.ordering[0].descending);
    }

    #[test]
    fn it_ignores_non_true_stock_flags() {
        let filter = ProductListParams {
            in_stock: Some("yes".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert!(!filter.in_stock);
    }

    #[test]
    fn it_rejects_malformed_bounds() {
        let err = ProductListParams {
            max_price: Some("cheap".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation {
                field: "max_price",
                ..
            }
        ));
    }

    #[test]
    fn it_echoes_raw_search_filters() {
        let (search, echo) = ProductSearchParams {
            q: Some("smart tv".to_string()),
            min_price: Some("100".to_string()),
            ..Default::default()
        }
        .into_search()
        .unwrap();

        assert_eq!(search.query, "smart tv");
        assert_eq!(search.min_price, Some(Decimal::from(100)));
        assert_eq!(echo.min_price.as_deref(), Some("100"));
        assert_eq!(echo.category, "");
        assert!(!echo.in_stock);
    }

    #[test]
    fn it_rejects_unknown_stock_operations() {
        let req = StockUpdateRequest {
            stock: Some(1),
            operation: Some("remove".to_string()),
        };
        assert!(matches!(
            req.into_domain(),
            Err(CatalogError::Validation {
                field: "operation",
                ..
            })
        ));
    }
}
