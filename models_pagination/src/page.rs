use serde::Serialize;
use thiserror::Error;

use crate::links;

/// The number of rows on a page when the caller does not choose
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// The requested page was not a positive integer or is past the last page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid page.")]
pub struct InvalidPage;

/// A validated request for a single page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// create a new [PageRequest], page numbers start at 1
    pub fn new(page: u32, page_size: u32) -> Result<Self, InvalidPage> {
        if page == 0 || page_size == 0 {
            return Err(InvalidPage);
        }
        Ok(PageRequest { page, page_size })
    }

    /// parse a raw `page` query value using the [DEFAULT_PAGE_SIZE]
    pub fn parse(raw: Option<&str>) -> Result<Self, InvalidPage> {
        match raw {
            None => Ok(Self::default()),
            Some(raw) => {
                let page = raw.trim().parse::<u32>().map_err(|_| InvalidPage)?;
                Self::new(page, DEFAULT_PAGE_SIZE)
            }
        }
    }

    /// the 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// the number of rows per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// the SQL `LIMIT` for this page
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// the SQL `OFFSET` for this page
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// the number of pages needed to hold `count` rows. There is always at least one page.
    pub fn num_pages(&self, count: i64) -> u32 {
        let size = i64::from(self.page_size);
        let pages = (count.max(0) + size - 1) / size;
        u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
    }
}

/// the rows of a single page together with the total number of matching rows
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// the rows on this page
    pub items: Vec<T>,
    /// the total number of rows across every page
    pub count: i64,
}

impl<T> Page<T> {
    /// create a new [Page]
    pub fn new(items: Vec<T>, count: i64) -> Self {
        Page { items, count }
    }

    /// maps the inner type of the items to a new value using a callback function
    pub fn map<F, V>(self, f: F) -> Page<V>
    where
        F: FnMut(T) -> V,
    {
        let Page { items, count } = self;

        Page {
            items: items.into_iter().map(f).collect(),
            count,
        }
    }
}

/// The json envelope returned by every paginated endpoint
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// the total number of rows across every page
    pub count: i64,
    /// link to the following page, absent on the last page
    pub next: Option<String>,
    /// link to the preceding page, absent on the first page
    pub previous: Option<String>,
    /// the rows on this page
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// Build the envelope for `page`, linking relative to the request `path` and `query`.
    /// Fails with [InvalidPage] when the requested page is past the last page.
    pub fn from_page(
        page: Page<T>,
        request: &PageRequest,
        path: &str,
        query: Option<&str>,
    ) -> Result<Self, InvalidPage> {
        let num_pages = request.num_pages(page.count);
        if request.page() > num_pages {
            return Err(InvalidPage);
        }

        let next = (request.page() < num_pages)
            .then(|| links::with_page(path, query, Some(request.page() + 1)));

        let previous = match request.page() {
            1 => None,
            2 => Some(links::with_page(path, query, None)),
            n => Some(links::with_page(path, query, Some(n - 1))),
        };

        Ok(PaginatedResponse {
            count: page.count,
            next,
            previous,
            results: page.items,
        })
    }

    /// maps the inner type of the results to a new value using a callback function
    pub fn map<F, V>(self, f: F) -> PaginatedResponse<V>
    where
        F: FnMut(T) -> V,
    {
        PaginatedResponse {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_computes_limit_and_offset() {
        let req = PageRequest::new(3, 20).unwrap();
        assert_eq!(req.limit(), 20);
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn it_rejects_non_positive_pages() {
        assert_eq!(PageRequest::parse(Some("0")), Err(InvalidPage));
        assert_eq!(PageRequest::parse(Some("-1")), Err(InvalidPage));
        assert_eq!(PageRequest::parse(Some("last")), Err(InvalidPage));
        assert_eq!(PageRequest::parse(None), Ok(PageRequest::default()));
        assert_eq!(PageRequest::parse(Some(" 2 ")).unwrap().page(), 2);
    }

    #[test]
    fn it_always_has_one_page() {
        let req = PageRequest::default();
        assert_eq!(req.num_pages(0), 1);
        assert_eq!(req.num_pages(20), 1);
        assert_eq!(req.num_pages(21), 2);
    }

    #[test]
    fn it_allows_an_empty_first_page() {
        let res =
            PaginatedResponse::<u8>::from_page(Page::new(vec![], 0), &PageRequest::default(), "/api/products", None)
                .unwrap();

        assert_eq!(res.count, 0);
        assert!(res.next.is_none());
        assert!(res.previous.is_none());
    }

    #[test]
    fn it_rejects_pages_past_the_end() {
        let req = PageRequest::new(3, 20).unwrap();
        let res = PaginatedResponse::<u8>::from_page(Page::new(vec![], 40), &req, "/api/products", None);
        assert_eq!(res.unwrap_err(), InvalidPage);
    }

    #[test]
    fn it_links_neighbouring_pages() {
        let req = PageRequest::new(2, 20).unwrap();
        let res = PaginatedResponse::from_page(
            Page::new(vec![1, 2, 3], 45),
            &req,
            "/api/products",
            Some("search=phone&page=2"),
        )
        .unwrap();

        assert_eq!(
            res.next.as_deref(),
            Some("/api/products?page=3&search=phone")
        );
        assert_eq!(res.previous.as_deref(), Some("/api/products?search=phone"));
        assert_eq!(res.results, vec![1, 2, 3]);
    }
}
