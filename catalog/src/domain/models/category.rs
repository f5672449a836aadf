use chrono::{DateTime, Utc};

use super::{CatalogError, ProductDetail};

pub const CATEGORY_NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// products referencing this category, active or not
    pub products_count: i64,
}

/// The fields accepted when creating a category
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub(crate) fn validate(self) -> Result<Self, CatalogError> {
        Ok(NewCategory {
            name: validate_category_name(&self.name)?,
            description: self.description,
        })
    }
}

/// A partial change to a category, absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl CategoryUpdate {
    pub(crate) fn validate(self) -> Result<Self, CatalogError> {
        Ok(CategoryUpdate {
            name: self
                .name
                .as_deref()
                .map(validate_category_name)
                .transpose()?,
            ..self
        })
    }
}

fn validate_category_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::invalid("name", "This field may not be blank."));
    }
    if name.chars().count() > CATEGORY_NAME_MAX_LEN {
        return Err(CatalogError::invalid(
            "name",
            "Ensure this field has no more than 100 characters.",
        ));
    }
    Ok(name.to_string())
}

/// A category together with its active products
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProducts {
    pub category: Category,
    pub products: Vec<ProductDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    pub total_categories: i64,
    /// active categories with at least one active product
    pub categories_with_products: i64,
    pub empty_categories: i64,
}

impl CategoryStats {
    pub fn new(total_categories: i64, categories_with_products: i64) -> Self {
        CategoryStats {
            total_categories,
            categories_with_products,
            empty_categories: total_categories - categories_with_products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_trims_the_name() {
        let new = NewCategory {
            name: "  Electronics ".to_string(),
            description: None,
        }
        .validate()
        .unwrap();
        assert_eq!(new.name, "Electronics");
    }

    #[test]
    fn it_rejects_blank_and_long_names() {
        let blank = NewCategory {
            name: "   ".to_string(),
            description: None,
        }
        .validate();
        assert!(matches!(blank, Err(CatalogError::Validation { field: "name", .. })));

        let long = CategoryUpdate {
            name: Some("x".repeat(101)),
            ..Default::default()
        }
        .validate();
        assert!(matches!(long, Err(CatalogError::Validation { field: "name", .. })));

        let untouched = CategoryUpdate {
            is_active: Some(false),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(untouched.name, None);
    }

    #[test]
    fn it_derives_empty_categories() {
        let stats = CategoryStats::new(5, 3);
        assert_eq!(stats.empty_categories, 2);
    }
}
