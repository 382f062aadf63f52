mod catalog_client;
pub mod models;
pub mod parsers;

pub use catalog_client::{CatalogClient, CatalogSource, StaticSource};
pub use models::RawEventDocument;
