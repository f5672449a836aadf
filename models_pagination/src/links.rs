use url::form_urlencoded;

/// Rebuild `path?query` with the `page` parameter replaced by `page`, or removed when `None`.
/// Query pairs are emitted sorted by key so links are stable.
pub(crate) fn with_page(path: &str, query: Option<&str>, page: Option<u32>) -> String {
    let mut pairs: Vec<(String, String)> = query
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .filter(|(k, _)| k != "page")
                .collect()
        })
        .unwrap_or_default();

    if let Some(page) = page {
        pairs.push(("page".to_string(), page.to_string()));
    }

    if pairs.is_empty() {
        return path.to_string();
    }

    pairs.sort();

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    format!("{path}?{query}")
}
