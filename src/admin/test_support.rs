use crate::catalog_store::{PriceEntry, Product, ProductStore, SqliteProductStore};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListProducts,
    InsertProduct,
    UpdateProduct,
    DeleteProduct,
    ListPriceHistory,
    LatestPrice,
    InsertPrice,
    DeletePrice,
    DeletePriceHistory,
}

/// In-memory store that fails selected operations on demand and records
/// every call it receives.
pub struct FaultyStore {
    inner: SqliteProductStore,
    failing: Mutex<HashSet<Op>>,
    calls: Mutex<Vec<Op>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteProductStore::in_memory().unwrap(),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, op: Op) -> usize {
        self.calls().iter().filter(|c| **c == op).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn enter(&self, op: Op) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            bail!("simulated {:?} failure", op);
        }
        Ok(())
    }
}

impl ProductStore for FaultyStore {
    fn list_products(&self) -> Result<Vec<Product>> {
        self.enter(Op::ListProducts)?;
        self.inner.list_products()
    }

    fn get_product(&self, prodcode: &str) -> Result<Option<Product>> {
        self.inner.get_product(prodcode)
    }

    fn insert_product(&self, product: &Product) -> Result<()> {
        self.enter(Op::InsertProduct)?;
        self.inner.insert_product(product)
    }

    fn update_product(&self, original_prodcode: &str, product: &Product) -> Result<bool> {
        self.enter(Op::UpdateProduct)?;
        self.inner.update_product(original_prodcode, product)
    }

    fn delete_product(&self, prodcode: &str) -> Result<bool> {
        self.enter(Op::DeleteProduct)?;
        self.inner.delete_product(prodcode)
    }

    fn list_price_history(&self, prodcode: &str) -> Result<Vec<PriceEntry>> {
        self.enter(Op::ListPriceHistory)?;
        self.inner.list_price_history(prodcode)
    }

    fn latest_price(&self, prodcode: &str) -> Result<Option<PriceEntry>> {
        self.enter(Op::LatestPrice)?;
        self.inner.latest_price(prodcode)
    }

    fn insert_price(&self, entry: &PriceEntry) -> Result<()> {
        self.enter(Op::InsertPrice)?;
        self.inner.insert_price(entry)
    }

    fn update_price(
        &self,
        prodcode: &str,
        original_effdate: NaiveDate,
        entry: &PriceEntry,
    ) -> Result<bool> {
        self.inner.update_price(prodcode, original_effdate, entry)
    }

    fn delete_price(&self, prodcode: &str, effdate: NaiveDate) -> Result<bool> {
        self.enter(Op::DeletePrice)?;
        self.inner.delete_price(prodcode, effdate)
    }

    fn delete_price_history(&self, prodcode: &str) -> Result<usize> {
        self.enter(Op::DeletePriceHistory)?;
        self.inner.delete_price_history(prodcode)
    }

    fn count_products(&self) -> Result<usize> {
        self.inner.count_products()
    }

    fn count_price_entries(&self) -> Result<usize> {
        self.inner.count_price_entries()
    }
}

pub fn product(code: &str, description: &str, unit: &str) -> Product {
    Product {
        prodcode: code.to_string(),
        description: description.to_string(),
        unit: unit.to_string(),
    }
}

pub fn price(code: &str, date: &str, amount: &str) -> PriceEntry {
    PriceEntry {
        prodcode: code.to_string(),
        effdate: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        unitprice: Decimal::from_str(amount).unwrap(),
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}
