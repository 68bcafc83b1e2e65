//! Common test infrastructure
//!
//! Everything the end-to-end tests need: a server on a random port backed by
//! a seeded temporary database, and an HTTP client for its endpoints.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, PEN_CODE};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_get_product() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.get_product(PEN_CODE).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;

#[allow(unused_imports)]
pub(crate) use fixtures::create_test_catalog;
