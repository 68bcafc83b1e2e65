use super::models::{PriceEntry, Product, EFFDATE_FORMAT};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::ProductStore;
use crate::sqlite_persistence::open_versioned_db;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct SqliteProductStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProductStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned_db(db_path.as_ref(), CATALOG_VERSIONED_SCHEMAS, "catalog")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// A store backed by a private in-memory database, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        CATALOG_VERSIONED_SCHEMAS
            .last()
            .context("No catalog schema defined")?
            .create(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
        Ok(Product {
            prodcode: row.get("prodcode")?,
            description: row.get("description")?,
            unit: row.get("unit")?,
        })
    }

    fn row_to_price_entry(row: &rusqlite::Row) -> rusqlite::Result<PriceEntry> {
        let effdate_str: String = row.get("effdate")?;
        let effdate = NaiveDate::parse_from_str(&effdate_str, EFFDATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
        })?;
        let unitprice_str: String = row.get("unitprice")?;
        let unitprice = Decimal::from_str(&unitprice_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
        })?;

        Ok(PriceEntry {
            prodcode: row.get("prodcode")?,
            effdate,
            unitprice,
        })
    }

    fn format_effdate(date: &NaiveDate) -> String {
        date.format(EFFDATE_FORMAT).to_string()
    }
}

impl ProductStore for SqliteProductStore {
    fn list_products(&self) -> Result<Vec<Product>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT prodcode, description, unit FROM product")?;
        let products = stmt
            .query_map([], Self::row_to_product)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    fn get_product(&self, prodcode: &str) -> Result<Option<Product>> {
        let conn = self.conn.lock().unwrap();
        let product = conn
            .query_row(
                "SELECT prodcode, description, unit FROM product WHERE prodcode = ?1",
                params![prodcode],
                Self::row_to_product,
            )
            .optional()?;
        Ok(product)
    }

    fn insert_product(&self, product: &Product) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO product (prodcode, description, unit) VALUES (?1, ?2, ?3)",
            params![&product.prodcode, &product.description, &product.unit],
        )?;
        debug!("Inserted product {}", product.prodcode);
        Ok(())
    }

    fn update_product(&self, original_prodcode: &str, product: &Product) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE product SET prodcode = ?1, description = ?2, unit = ?3 WHERE prodcode = ?4",
            params![
                &product.prodcode,
                &product.description,
                &product.unit,
                original_prodcode
            ],
        )?;
        Ok(updated > 0)
    }

    fn delete_product(&self, prodcode: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM product WHERE prodcode = ?1", params![prodcode])?;
        Ok(deleted > 0)
    }

    fn list_price_history(&self, prodcode: &str) -> Result<Vec<PriceEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT prodcode, effdate, unitprice FROM pricehist
             WHERE prodcode = ?1 ORDER BY effdate DESC",
        )?;
        let entries = stmt
            .query_map(params![prodcode], Self::row_to_price_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn latest_price(&self, prodcode: &str) -> Result<Option<PriceEntry>> {
        let conn = self.conn.lock().unwrap();
        let entry = conn
            .query_row(
                "SELECT prodcode, effdate, unitprice FROM pricehist
                 WHERE prodcode = ?1 ORDER BY effdate DESC LIMIT 1",
                params![prodcode],
                Self::row_to_price_entry,
            )
            .optional()?;
        Ok(entry)
    }

    fn insert_price(&self, entry: &PriceEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO pricehist (prodcode, effdate, unitprice) VALUES (?1, ?2, ?3)",
            params![
                &entry.prodcode,
                Self::format_effdate(&entry.effdate),
                entry.unitprice.to_string()
            ],
        )?;
        debug!("Inserted price {} for {}", entry.effdate, entry.prodcode);
        Ok(())
    }

    fn update_price(
        &self,
        prodcode: &str,
        original_effdate: NaiveDate,
        entry: &PriceEntry,
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE pricehist SET prodcode = ?1, effdate = ?2, unitprice = ?3
             WHERE prodcode = ?4 AND effdate = ?5",
            params![
                &entry.prodcode,
                Self::format_effdate(&entry.effdate),
                entry.unitprice.to_string(),
                prodcode,
                Self::format_effdate(&original_effdate)
            ],
        )?;
        Ok(updated > 0)
    }

    fn delete_price(&self, prodcode: &str, effdate: NaiveDate) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM pricehist WHERE prodcode = ?1 AND effdate = ?2",
            params![prodcode, Self::format_effdate(&effdate)],
        )?;
        Ok(deleted > 0)
    }

    fn delete_price_history(&self, prodcode: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM pricehist WHERE prodcode = ?1", params![prodcode])?;
        Ok(deleted)
    }

    fn count_products(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM product", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn count_price_entries(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pricehist", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}
