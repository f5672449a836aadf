use super::CatalogError;

/// How a stock update combines the requested quantity with the current stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StockOperation {
    Add,
    Reduce,
    Set,
}

/// A request to change the stock of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockUpdate {
    pub operation: StockOperation,
    pub quantity: i64,
}

impl StockOperation {
    /// Compute the stock that results from applying this operation with `quantity` to `current`
    pub fn apply(self, current: i32, quantity: i64) -> Result<i32, CatalogError> {
        if quantity < 0 {
            return Err(CatalogError::invalid(
                "stock",
                "Ensure this value is greater than or equal to 0.",
            ));
        }

        let too_large = || {
            CatalogError::invalid(
                "stock",
                format!("Ensure the resulting stock is less than or equal to {}.", i32::MAX),
            )
        };

        let next = match self {
            StockOperation::Add => i64::from(current)
                .checked_add(quantity)
                .ok_or_else(too_large)?,
            StockOperation::Reduce if quantity == 0 => {
                return Err(CatalogError::invalid(
                    "stock",
                    "The quantity to reduce must be greater than zero.",
                ));
            }
            StockOperation::Reduce if quantity > i64::from(current) => {
                return Err(CatalogError::InsufficientStock);
            }
            StockOperation::Reduce => i64::from(current) - quantity,
            StockOperation::Set => quantity,
        };

        i32::try_from(next).map_err(|_| too_large())
    }
}
