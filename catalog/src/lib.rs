//! This crate contains the product catalog: categories, products and their images.

/// The domain module contains the models, ports and business rules of the catalog
pub mod domain;

/// The inbound module exposes the catalog over http
pub mod inbound;

/// The outbound module implements the catalog storage ports
pub mod outbound;
