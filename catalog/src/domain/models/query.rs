use rust_decimal::Decimal;

/// Split a free text search into terms on whitespace and commas
pub fn split_search_terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a case-insensitive substring pattern for `ILIKE`, escaping the pattern wildcards in `term`
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// The product columns a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProductOrderField {
    Name,
    Price,
    CreatedAt,
    Stock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductOrdering {
    pub field: ProductOrderField,
    pub descending: bool,
}

impl ProductOrdering {
    /// newest first
    pub const DEFAULT: ProductOrdering = ProductOrdering {
        field: ProductOrderField::CreatedAt,
        descending: true,
    };

    /// Parse a comma separated ordering such as `-price,name`.
    /// Unknown and repeated fields are skipped. An empty result falls back to [Self::DEFAULT].
    pub fn parse_list(raw: Option<&str>) -> Vec<ProductOrdering> {
        let mut out: Vec<ProductOrdering> = Vec::new();

        for part in raw.unwrap_or_default().split(',').map(str::trim) {
            let (descending, name) = match part.strip_prefix('-') {
                Some(name) => (true, name),
                None => (false, part),
            };
            let Ok(field) = name.parse::<ProductOrderField>() else {
                continue;
            };
            if out.iter().any(|o| o.field == field) {
                continue;
            }
            out.push(ProductOrdering { field, descending });
        }

        if out.is_empty() {
            out.push(Self::DEFAULT);
        }
        out
    }
}

/// Filters for listing categories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    /// case-insensitive substring of the name or description
    pub search: Option<String>,
}

/// Filters shared by product listing and product search.
/// Every present filter narrows the result; only active products are ever returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    /// every term must match the name, description or sku
    pub search_terms: Vec<String>,
    /// case-insensitive substring of the category name
    pub category_name: Option<String>,
    pub category_id: Option<i64>,
    pub is_active: Option<bool>,
    /// inclusive
    pub min_price: Option<Decimal>,
    /// inclusive
    pub max_price: Option<Decimal>,
    /// only products with stock above zero
    pub in_stock: bool,
    pub ordering: Vec<ProductOrdering>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductFilter {
            search_terms: Vec::new(),
            category_name: None,
            category_id: None,
            is_active: None,
            min_price: None,
            max_price: None,
            in_stock: false,
            ordering: vec![ProductOrdering::DEFAULT],
        }
    }
}

/// The inputs of the product search endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSearch {
    /// matched as a single term
    pub query: String,
    pub category: String,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: bool,
}

impl ProductSearch {
    pub fn to_filter(&self) -> ProductFilter {
        let non_blank = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ProductFilter {
            search_terms: non_blank(&self.query).into_iter().collect(),
            category_name: non_blank(&self.category),
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock: self.in_stock,
            ..Default::default()
        }
    }
}
