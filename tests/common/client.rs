//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per endpoint. When API routes or request
//! formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// GET /v1/products?q=
    pub async fn list_products(&self, query: Option<&str>) -> Response {
        let mut request = self.client.get(self.url("/v1/products"));
        if let Some(query) = query {
            request = request.query(&[("q", query)]);
        }
        request.send().await.expect("List products request failed")
    }

    /// GET /v1/products/{prodcode}
    pub async fn get_product(&self, prodcode: &str) -> Response {
        self.client
            .get(self.url(&format!("/v1/products/{}", prodcode)))
            .send()
            .await
            .expect("Get product request failed")
    }

    /// POST /v1/products
    pub async fn create_product(&self, prodcode: &str, description: &str, unit: &str) -> Response {
        self.client
            .post(self.url("/v1/products"))
            .json(&json!({
                "prodcode": prodcode,
                "description": description,
                "unit": unit,
            }))
            .send()
            .await
            .expect("Create product request failed")
    }

    /// PUT /v1/products/{prodcode}
    pub async fn update_product(&self, prodcode: &str, description: &str, unit: &str) -> Response {
        self.client
            .put(self.url(&format!("/v1/products/{}", prodcode)))
            .json(&json!({
                "description": description,
                "unit": unit,
            }))
            .send()
            .await
            .expect("Update product request failed")
    }

    /// PUT /v1/products/{prodcode} with a raw body
    pub async fn update_product_raw(&self, prodcode: &str, body: serde_json::Value) -> Response {
        self.client
            .put(self.url(&format!("/v1/products/{}", prodcode)))
            .json(&body)
            .send()
            .await
            .expect("Update product request failed")
    }

    /// DELETE /v1/products/{prodcode}
    pub async fn delete_product(&self, prodcode: &str) -> Response {
        self.client
            .delete(self.url(&format!("/v1/products/{}", prodcode)))
            .send()
            .await
            .expect("Delete product request failed")
    }

    // ========================================================================
    // Price history
    // ========================================================================

    /// GET /v1/products/{prodcode}/prices
    pub async fn list_prices(&self, prodcode: &str) -> Response {
        self.client
            .get(self.url(&format!("/v1/products/{}/prices", prodcode)))
            .send()
            .await
            .expect("List prices request failed")
    }

    /// POST /v1/products/{prodcode}/prices
    pub async fn create_price(&self, prodcode: &str, effdate: &str, unitprice: &str) -> Response {
        self.client
            .post(self.url(&format!("/v1/products/{}/prices", prodcode)))
            .json(&json!({
                "effdate": effdate,
                "unitprice": unitprice,
            }))
            .send()
            .await
            .expect("Create price request failed")
    }

    /// PUT /v1/products/{prodcode}/prices/{effdate}
    pub async fn update_price(&self, prodcode: &str, effdate: &str, unitprice: &str) -> Response {
        self.client
            .put(self.url(&format!("/v1/products/{}/prices/{}", prodcode, effdate)))
            .json(&json!({ "unitprice": unitprice }))
            .send()
            .await
            .expect("Update price request failed")
    }

    /// DELETE /v1/products/{prodcode}/prices/{effdate}
    pub async fn delete_price(&self, prodcode: &str, effdate: &str) -> Response {
        self.client
            .delete(self.url(&format!("/v1/products/{}/prices/{}", prodcode, effdate)))
            .send()
            .await
            .expect("Delete price request failed")
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// GET /v1/dashboard
    pub async fn dashboard(&self) -> Response {
        self.client
            .get(self.url("/v1/dashboard"))
            .send()
            .await
            .expect("Dashboard request failed")
    }

    /// GET /v1/navigation
    pub async fn navigation(&self) -> Response {
        self.client
            .get(self.url("/v1/navigation"))
            .send()
            .await
            .expect("Navigation request failed")
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Home request failed")
    }
}
