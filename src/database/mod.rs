pub mod connection;
mod kv;
pub mod setup;

pub use connection::{DbConn, DbPool, create_pool, get_connection};
pub use kv::SqliteStore;
