use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use super::{CatalogError, Category, ProductImage, price_display, validate_price};

pub const PRODUCT_NAME_MAX_LEN: usize = 200;
pub const SKU_MAX_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i64,
    pub image: Option<String>,
    pub stock: i32,
    pub sku: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn price_display(&self) -> String {
        price_display(self.price)
    }
}

/// The compact row used by product listings
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub category_name: String,
    pub image: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl ProductSummary {
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn price_display(&self) -> String {
        price_display(self.price)
    }
}

/// A product with its category and additional images
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Category,
    pub additional_images: Vec<ProductImage>,
}

/// The fields a client sends to create a product
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i64,
    pub image: Option<String>,
    /// defaults to zero
    pub stock: Option<i64>,
    /// generated when absent
    pub sku: Option<String>,
}

/// A validated product ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i64,
    pub image: Option<String>,
    pub stock: i32,
    pub sku: String,
}

/// Field level checks of a create request, the sku is resolved separately
pub(crate) struct ValidCreateProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i64,
    pub image: Option<String>,
    pub stock: i32,
    pub sku: Option<String>,
}

impl CreateProduct {
    pub(crate) fn validate(self) -> Result<ValidCreateProduct, CatalogError> {
        Ok(ValidCreateProduct {
            name: validate_product_name(&self.name)?,
            description: validate_description(&self.description)?,
            price: validate_price(self.price)?,
            category_id: self.category_id,
            image: validate_image(self.image)?,
            stock: validate_stock(self.stock.unwrap_or_default())?,
            sku: self.sku.as_deref().map(validate_sku).transpose()?,
        })
    }
}

impl ValidCreateProduct {
    pub(crate) fn with_sku(self, sku: String) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
            image: self.image,
            stock: self.stock,
            sku,
        }
    }
}

/// A partial change to a product as sent by a client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    /// `Some(None)` clears the image
    pub image: Option<Option<String>>,
    pub stock: Option<i64>,
    pub is_active: Option<bool>,
}

/// A validated [ProductUpdate]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub image: Option<Option<String>>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    pub(crate) fn validate(self) -> Result<ProductChanges, CatalogError> {
        Ok(ProductChanges {
            name: self
                .name
                .as_deref()
                .map(validate_product_name)
                .transpose()?,
            description: self
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            price: self.price.map(validate_price).transpose()?,
            category_id: self.category_id,
            image: self.image.map(validate_image).transpose()?,
            stock: self.stock.map(validate_stock).transpose()?,
            is_active: self.is_active,
        })
    }
}

fn validate_product_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::invalid("name", "This field may not be blank."));
    }
    if name.chars().count() > PRODUCT_NAME_MAX_LEN {
        return Err(CatalogError::invalid(
            "name",
            "Ensure this field has no more than 200 characters.",
        ));
    }
    Ok(name.to_string())
}

fn validate_description(description: &str) -> Result<String, CatalogError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(CatalogError::invalid(
            "description",
            "This field may not be blank.",
        ));
    }
    Ok(description.to_string())
}

/// blank images are treated as no image
fn validate_image(image: Option<String>) -> Result<Option<String>, CatalogError> {
    let Some(image) = image.map(|i| i.trim().to_string()).filter(|i| !i.is_empty()) else {
        return Ok(None);
    };
    if image.chars().count() > super::IMAGE_MAX_LEN {
        return Err(CatalogError::invalid(
            "image",
            "Ensure this field has no more than 100 characters.",
        ));
    }
    Ok(Some(image))
}

fn validate_stock(stock: i64) -> Result<i32, CatalogError> {
    if stock < 0 {
        return Err(CatalogError::invalid(
            "stock",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    i32::try_from(stock).map_err(|_| {
        CatalogError::invalid(
            "stock",
            format!("Ensure this value is less than or equal to {}.", i32::MAX),
        )
    })
}

fn validate_sku(sku: &str) -> Result<String, CatalogError> {
    let sku = sku.trim();
    if sku.is_empty() {
        return Err(CatalogError::invalid("sku", "This field may not be blank."));
    }
    if sku.chars().count() > SKU_MAX_LEN {
        return Err(CatalogError::invalid(
            "sku",
            "Ensure this field has no more than 50 characters.",
        ));
    }
    Ok(sku.to_string())
}

/// Number of active products in a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub total_products: i64,
    pub products_in_stock: i64,
    pub out_of_stock: i64,
    /// rounded to two places, zero when there are no products
    pub average_price: f64,
    /// ordered by count, largest first
    pub products_by_category: Vec<CategoryCount>,
}

impl ProductStats {
    pub fn new(
        total_products: i64,
        products_in_stock: i64,
        average_price: Option<Decimal>,
        products_by_category: Vec<CategoryCount>,
    ) -> Self {
        ProductStats {
            total_products,
            products_in_stock,
            out_of_stock: total_products - products_in_stock,
            average_price: average_price
                .map(|avg| avg.round_dp(2))
                .and_then(|avg| avg.to_f64())
                .unwrap_or_default(),
            products_by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create() -> CreateProduct {
        CreateProduct {
            name: " Smart TV ".to_string(),
            description: "55 inch".to_string(),
            price: dec!(1500000),
            category_id: 1,
            image: None,
            stock: None,
            sku: None,
        }
    }

    #[test]
    fn it_validates_a_create_request() {
        let valid = create().validate().unwrap();
        assert_eq!(valid.name, "Smart TV");
        assert_eq!(valid.stock, 0);
        assert_eq!(valid.sku, None);

        let new = valid.with_sku("SKU-1".to_string());
        assert_eq!(new.sku, "SKU-1");
    }

    #[test]
    fn it_reports_the_failing_field() {
        let cases = [
            (
                CreateProduct {
                    description: "  ".to_string(),
                    ..create()
                },
                "description",
            ),
            (
                CreateProduct {
                    price: dec!(0),
                    ..create()
                },
                "price",
            ),
            (
                CreateProduct {
                    stock: Some(-1),
                    ..create()
                },
                "stock",
            ),
            (
                CreateProduct {
                    sku: Some("x".repeat(51)),
                    ..create()
                },
                "sku",
            ),
            (
                CreateProduct {
                    image: Some("x".repeat(101)),
                    ..create()
                },
                "image",
            ),
        ];

        for (req, expected) in cases {
            match req.validate() {
                Err(CatalogError::Validation { field, .. }) => assert_eq!(field, expected),
                _ => panic!("expected a validation error on {expected}"),
            }
        }
    }

    #[test]
    fn it_treats_blank_images_as_absent() {
        let valid = CreateProduct {
            image: Some("   ".to_string()),
            ..create()
        }
        .validate()
        .unwrap();
        assert_eq!(valid.image, None);
    }

    #[test]
    fn it_only_validates_present_update_fields() {
        let changes = ProductUpdate {
            stock: Some(7),
            image: Some(None),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(
            changes,
            ProductChanges {
                stock: Some(7),
                image: Some(None),
                ..Default::default()
            }
        );

        let err = ProductUpdate {
            stock: Some(i64::from(i32::MAX) + 1),
            ..Default::default()
        }
        .validate();
        assert!(matches!(err, Err(CatalogError::Validation { field: "stock", .. })));
    }

    #[test]
    fn it_rounds_the_average_price() {
        let stats = ProductStats::new(3, 2, Some(dec!(1234.5678)), vec![]);
        assert_eq!(stats.out_of_stock, 1);
        assert!((stats.average_price - 1234.57).abs() < 1e-9);

        let empty = ProductStats::new(0, 0, None, vec![]);
        assert_eq!(empty.average_price, 0.0);
    }

    #[test]
    fn it_formats_derived_fields() {
        let summary = ProductSummary {
            id: 1,
            name: "TV".to_string(),
            price: dec!(4500000.00),
            category_name: "Electronics".to_string(),
            image: None,
            stock: 0,
            created_at: Default::default(),
        };
        assert!(!summary.is_in_stock());
        assert_eq!(summary.price_display(), "$4,500,000.00");
    }
}
