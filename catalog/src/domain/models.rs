mod category;
mod error;
mod image;
mod price;
mod product;
mod query;
mod sku;
mod stock;

pub use category::*;
pub use error::*;
pub use image::*;
pub use price::*;
pub use product::*;
pub use query::*;
pub use sku::*;
pub use stock::*;
