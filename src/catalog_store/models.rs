use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Format used for effective dates, both on disk and in form input.
pub const EFFDATE_FORMAT: &str = "%Y-%m-%d";

/// A catalog product. `prodcode` is the primary key and never changes once
/// the product exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub prodcode: String,
    pub description: String,
    pub unit: String,
}

/// One row of a product's price history, keyed by (`prodcode`, `effdate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub prodcode: String,
    pub effdate: NaiveDate,
    pub unitprice: Decimal,
}

/// Renders a price the way the dashboard shows it: `$` and two decimals.
pub fn format_price(price: &Decimal) -> String {
    let mut rounded = price.round_dp(2);
    rounded.rescale(2);
    format!("${}", rounded)
}

/// Renders an effective date for display, e.g. `01-Jan-2024`.
pub fn format_effdate(date: &NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}
