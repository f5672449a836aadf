use chrono::NaiveDate;
use uuid::Uuid;

const NAME_PREFIX_LEN: usize = 10;
const SUFFIX_LEN: usize = 8;

/// Generate a stock keeping unit of the form `{NAME}-{YYYYMMDD}-{SUFFIX}`.
///
/// `NAME` is the product name without spaces, upper-cased and cut to 10 characters.
/// `SUFFIX` is the first 8 hex characters of `id`, upper-cased.
pub fn generate_sku(name: &str, date: NaiveDate, id: Uuid) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_uppercase)
        .take(NAME_PREFIX_LEN)
        .collect();

    let suffix: String = id
        .hyphenated()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect::<String>()
        .to_uppercase();

    format!("{prefix}-{}-{suffix}", date.format("%Y%m%d"))
}

/// [generate_sku] for today's UTC date and a random v4 uuid
pub fn new_sku(name: &str) -> String {
    generate_sku(name, chrono::Utc::now().date_naive(), Uuid::new_v4())
}
