use std::borrow::Cow;
use thiserror::Error;

/// The errors a catalog operation can produce
#[derive(Debug, Error)]
pub enum CatalogError {
    /// the requested row does not exist or is no longer active
    #[error("Not found.")]
    NotFound,
    /// a request field failed validation
    #[error("{message}")]
    Validation {
        /// the request field at fault
        field: &'static str,
        /// human readable description of the failure
        message: Cow<'static, str>,
    },
    /// a stock reduction asked for more units than are available
    #[error("Insufficient stock")]
    InsufficientStock,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        CatalogError::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn required(field: &'static str) -> Self {
        Self::invalid(field, "This field is required.")
    }
}

/// The unique constraints storage can report a violation of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    CategoryName,
    Sku,
}

/// Errors produced by a [crate::domain::ports::CatalogRepo]
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unique constraint violated on {0:?}")]
    Conflict(UniqueField),
    #[error(transparent)]
    StorageLayerError(#[from] anyhow::Error),
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict(UniqueField::CategoryName) => {
                CatalogError::invalid("name", CATEGORY_NAME_TAKEN)
            }
            RepoError::Conflict(UniqueField::Sku) => CatalogError::invalid("sku", SKU_TAKEN),
            RepoError::StorageLayerError(e) => CatalogError::Internal(e),
        }
    }
}

pub(crate) const CATEGORY_NAME_TAKEN: &str = "A category with this name already exists.";
pub(crate) const SKU_TAKEN: &str = "A product with this SKU already exists.";
