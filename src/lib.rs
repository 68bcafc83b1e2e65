//! ProductHub catalog admin library
//!
//! Exposes the store, the view controllers and the HTTP server so the binaries
//! and the end-to-end tests can share them.

pub mod admin;
pub mod catalog_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

pub use catalog_store::{PriceEntry, Product, ProductStore, SqliteProductStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
