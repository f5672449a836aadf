use chrono::{DateTime, Utc};

use super::CatalogError;

pub const IMAGE_MAX_LEN: usize = 100;
pub const ALT_TEXT_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    /// stored path or url of the image
    pub image: String,
    pub alt_text: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// An additional image to attach to a product.
/// Saving one with `is_primary` demotes every other image of the product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductImage {
    pub image: String,
    pub alt_text: String,
    pub is_primary: bool,
}

impl NewProductImage {
    pub(crate) fn validate(self) -> Result<Self, CatalogError> {
        let image = self.image.trim().to_string();
        if image.is_empty() {
            return Err(CatalogError::invalid("image", "This field may not be blank."));
        }
        if image.chars().count() > IMAGE_MAX_LEN {
            return Err(CatalogError::invalid(
                "image",
                "Ensure this field has no more than 100 characters.",
            ));
        }
        let alt_text = self.alt_text.trim().to_string();
        if alt_text.chars().count() > ALT_TEXT_MAX_LEN {
            return Err(CatalogError::invalid(
                "alt_text",
                "Ensure this field has no more than 200 characters.",
            ));
        }
        Ok(NewProductImage {
            image,
            alt_text,
            is_primary: self.is_primary,
        })
    }
}
