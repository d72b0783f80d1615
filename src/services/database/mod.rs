//! Database service module.
//! SQLite connection handling and schema management.

mod connection;
pub mod migrations;
pub mod schema;

pub use connection::Database;
