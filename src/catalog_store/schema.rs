//! SQLite schema definitions for the product catalog database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Version 1 - Products and price history
// =============================================================================

const PRODUCT_TABLE_V1: Table = Table {
    name: "product",
    columns: &[
        sqlite_column!("prodcode", &SqlType::Text, is_primary_key = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!("unit", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

/// Price rows reference their product but do not cascade: deleting a product
/// that still has history fails, so callers must clear the history first.
const PRICEHIST_PRODUCT_FK: ForeignKey = ForeignKey {
    foreign_table: "product",
    foreign_column: "prodcode",
    on_delete: ForeignKeyOnChange::NoAction,
};

const PRICEHIST_TABLE_V1: Table = Table {
    name: "pricehist",
    columns: &[
        sqlite_column!(
            "prodcode",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&PRICEHIST_PRODUCT_FK)
        ),
        sqlite_column!("effdate", &SqlType::Text, non_null = true), // YYYY-MM-DD
        sqlite_column!("unitprice", &SqlType::Text, non_null = true), // decimal text
    ],
    indices: &[("idx_pricehist_prodcode", "prodcode")],
    unique_constraints: &[&["prodcode", "effdate"]],
};

/// All versioned schemas for the catalog database.
///
/// Version 1: product and pricehist tables
pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[PRODUCT_TABLE_V1, PRICEHIST_TABLE_V1],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn v1_schema_creates_and_validates() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = &CATALOG_VERSIONED_SCHEMAS[0];
        schema.create(&conn).unwrap();
        schema.validate(&conn).unwrap();
    }

    #[test]
    fn pricehist_rejects_unknown_product() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO pricehist (prodcode, effdate, unitprice) VALUES ('NOPE', '2024-01-01', '1.00')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn pricehist_rejects_duplicate_effdate() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();
        conn.execute(
            "INSERT INTO product (prodcode, description, unit) VALUES ('P1', 'Pen', 'pc')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO pricehist (prodcode, effdate, unitprice) VALUES ('P1', '2024-01-01', '1.00')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO pricehist (prodcode, effdate, unitprice) VALUES ('P1', '2024-01-01', '2.00')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn product_with_history_cannot_be_deleted_first() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();
        conn.execute(
            "INSERT INTO product (prodcode, description, unit) VALUES ('P1', 'Pen', 'pc')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO pricehist (prodcode, effdate, unitprice) VALUES ('P1', '2024-01-01', '1.00')",
            [],
        )
        .unwrap();

        assert!(conn
            .execute("DELETE FROM product WHERE prodcode = 'P1'", [])
            .is_err());
    }
}
