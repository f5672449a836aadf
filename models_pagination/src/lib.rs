#![deny(missing_docs)]
//! This crate supplies page-number pagination for list endpoints.
//! 1. A client asks for a 1-based [PageRequest] through the `page` query parameter.
//! 2. Storage answers with a [Page], the rows on that page plus the total row count.
//! 3. The handler turns the [Page] into a [PaginatedResponse] with `next` and `previous` links,
//!    rejecting pages past the end with [InvalidPage].

#[cfg(feature = "axum")]
mod axum;
mod links;
mod page;

#[cfg(feature = "axum")]
pub use axum::*;
pub use page::*;
