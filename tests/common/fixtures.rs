//! Seeded catalog database for end-to-end tests

use super::constants::*;
use anyhow::Result;
use chrono::NaiveDate;
use producthub_admin::catalog_store::{PriceEntry, Product, ProductStore, SqliteProductStore};
use producthub_admin::catalog_store::EFFDATE_FORMAT;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

fn price(prodcode: &str, effdate: &str, unitprice: &str) -> Result<PriceEntry> {
    Ok(PriceEntry {
        prodcode: prodcode.to_string(),
        effdate: NaiveDate::parse_from_str(effdate, EFFDATE_FORMAT)?,
        unitprice: Decimal::from_str(unitprice)?,
    })
}

fn product(prodcode: &str, description: &str, unit: &str) -> Product {
    Product {
        prodcode: prodcode.to_string(),
        description: description.to_string(),
        unit: unit.to_string(),
    }
}

/// Creates a temporary catalog.db with three products and three prices.
/// Returns (temp_dir, catalog_db_path)
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("catalog.db");

    let store = SqliteProductStore::new(&db_path)?;

    store.insert_product(&product(PEN_CODE, PEN_DESCRIPTION, PEN_UNIT))?;
    store.insert_product(&product(PAPER_CODE, PAPER_DESCRIPTION, PAPER_UNIT))?;
    store.insert_product(&product(STAPLER_CODE, STAPLER_DESCRIPTION, STAPLER_UNIT))?;

    store.insert_price(&price(PEN_CODE, PEN_OLD_EFFDATE, PEN_OLD_PRICE)?)?;
    store.insert_price(&price(PEN_CODE, PEN_EFFDATE, PEN_PRICE)?)?;
    store.insert_price(&price(PAPER_CODE, PAPER_EFFDATE, PAPER_PRICE)?)?;

    Ok((dir, db_path))
}
