pub mod catalog;
pub mod report;

pub use catalog::{CatalogLoad, CatalogOrigin, CatalogService, open_store};
