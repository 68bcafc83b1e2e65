mod models;
mod schema;
mod sqlite_product_store;

pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use sqlite_product_store::SqliteProductStore;

use anyhow::Result;
use chrono::NaiveDate;

/// Query interface to the relational store holding products and their price
/// history.
///
/// Every call is independent: there are no transactions spanning calls and
/// no version checks, so concurrent writers simply overwrite each other.
pub trait ProductStore: Send + Sync {
    // =========================================================================
    // product table
    // =========================================================================

    /// All products, in no particular order.
    fn list_products(&self) -> Result<Vec<Product>>;

    fn get_product(&self, prodcode: &str) -> Result<Option<Product>>;

    fn insert_product(&self, product: &Product) -> Result<()>;

    /// Overwrites the row whose key is `original_prodcode` with `product`.
    /// Returns false if no row matched.
    fn update_product(&self, original_prodcode: &str, product: &Product) -> Result<bool>;

    /// Returns false if no row matched.
    fn delete_product(&self, prodcode: &str) -> Result<bool>;

    // =========================================================================
    // pricehist table
    // =========================================================================

    /// Price history of a product, newest `effdate` first.
    fn list_price_history(&self, prodcode: &str) -> Result<Vec<PriceEntry>>;

    /// The entry with the greatest `effdate`, if the product has any.
    fn latest_price(&self, prodcode: &str) -> Result<Option<PriceEntry>>;

    fn insert_price(&self, entry: &PriceEntry) -> Result<()>;

    /// Overwrites the row keyed by (`prodcode`, `original_effdate`) with
    /// `entry`. Returns false if no row matched.
    fn update_price(
        &self,
        prodcode: &str,
        original_effdate: NaiveDate,
        entry: &PriceEntry,
    ) -> Result<bool>;

    /// Returns false if no row matched.
    fn delete_price(&self, prodcode: &str, effdate: NaiveDate) -> Result<bool>;

    /// Deletes every price row of a product, returning how many were removed.
    fn delete_price_history(&self, prodcode: &str) -> Result<usize>;

    // =========================================================================
    // Counts (for metrics)
    // =========================================================================

    fn count_products(&self) -> Result<usize>;

    fn count_price_entries(&self) -> Result<usize>;
}
