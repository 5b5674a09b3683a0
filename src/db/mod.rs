//! Database module
//!
//! Handles SQLite connection, migrations, and the provider implementations
//! backed by the stored pets, meals and supplements.

pub mod connection;
pub mod migrations;
pub mod providers;

pub use connection::{Database, DbError, DbResult};
