//! Shared constants for end-to-end tests
//!
//! When the seeded catalog changes, update only this file and fixtures.rs.

// ============================================================================
// Seeded Products
// ============================================================================

/// Product with two price entries, the newer one is current.
pub const PEN_CODE: &str = "PEN-01";
pub const PEN_DESCRIPTION: &str = "Ballpoint pen";
pub const PEN_UNIT: &str = "pc";
pub const PEN_OLD_EFFDATE: &str = "2023-01-15";
pub const PEN_OLD_PRICE: &str = "1.25";
pub const PEN_EFFDATE: &str = "2024-03-01";
pub const PEN_PRICE: &str = "1.50";

/// Product with a single price entry.
pub const PAPER_CODE: &str = "PAP-02";
pub const PAPER_DESCRIPTION: &str = "A4 copy paper";
pub const PAPER_UNIT: &str = "ream";
pub const PAPER_EFFDATE: &str = "2024-02-10";
pub const PAPER_PRICE: &str = "4.99";

/// Product without price history.
pub const STAPLER_CODE: &str = "STP-03";
pub const STAPLER_DESCRIPTION: &str = "Desk stapler";
pub const STAPLER_UNIT: &str = "ea";

/// Number of products in the seeded catalog.
pub const SEEDED_PRODUCTS: usize = 3;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
