mod catalog;
mod file_store;
mod store;

pub use catalog::{EventCatalogCache, SnapshotLookup};
pub use file_store::FileStore;
pub use store::{KeyValueStore, MemoryStore};
