use rust_decimal::Decimal;

use super::CatalogError;

const MAX_INTEGER_DIGITS: u32 = 8;
const MAX_DECIMAL_PLACES: u32 = 2;

/// Check a price fits `NUMERIC(10, 2)` and is at least one cent
pub fn validate_price(price: Decimal) -> Result<Decimal, CatalogError> {
    if price.normalize().scale() > MAX_DECIMAL_PLACES {
        return Err(CatalogError::invalid(
            "price",
            "Ensure that there are no more than 2 decimal places.",
        ));
    }
    if price.trunc().abs() >= Decimal::from(10u64.pow(MAX_INTEGER_DIGITS)) {
        return Err(CatalogError::invalid(
            "price",
            "Ensure that there are no more than 8 digits before the decimal point.",
        ));
    }
    if price < Decimal::new(1, 2) {
        return Err(CatalogError::invalid(
            "price",
            "Ensure this value is greater than or equal to 0.01.",
        ));
    }
    Ok(price)
}

/// Rescale to exactly two decimal places, the wire representation of every price
pub fn to_cents_scale(price: Decimal) -> Decimal {
    let mut price = price.round_dp(MAX_DECIMAL_PLACES);
    price.rescale(MAX_DECIMAL_PLACES);
    price
}

/// Format a price as currency, e.g. `$4,500,000.00`
pub fn price_display(price: Decimal) -> String {
    let formatted = to_cents_scale(price).abs().to_string();
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price.is_sign_negative() && !price.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}
