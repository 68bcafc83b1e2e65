//! View controllers of the admin dashboard.
//!
//! Each view owns its own state and talks to the store directly. Parents own
//! the dialogs they open; children report what happened through return values
//! and the parent decides whether to reload.

mod confirmation;
pub mod dashboard;
mod notification;
mod price_form;
mod product_detail;
mod product_form;
mod product_list;

#[cfg(test)]
pub(crate) mod test_support;

pub use confirmation::ConfirmationPrompt;
pub use notification::{Notification, NotificationKind, NotificationLog, Notifier};
pub use price_form::{PriceFormMode, PriceHistoryForm};
pub use product_detail::ProductDetailView;
pub use product_form::{ProductForm, ProductFormMode};
pub use product_list::{
    delete_product_cascade, filter_rows, load_product_rows, ListDialog, ProductListView,
    ProductRow,
};

use thiserror::Error;

pub const PRODUCT_DELETED_MESSAGE: &str = "Product deleted successfully";
pub const PRICE_DELETED_MESSAGE: &str = "Price deleted successfully";

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Invalid effective date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid unit price '{0}'")]
    InvalidPrice(String),

    #[error("Product {0} not found")]
    ProductNotFound(String),

    /// Failure reported by the store, message kept verbatim.
    #[error("{0}")]
    Store(String),
}

impl AdminError {
    /// True for errors caught before any store call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AdminError::MissingFields | AdminError::InvalidDate(_) | AdminError::InvalidPrice(_)
        )
    }
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        AdminError::Store(err.to_string())
    }
}

/// Whether a save went through as an insert or an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Added,
    Updated,
}

/// Result of a form submission, after notifications have been raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Saved(SaveKind),
    Rejected,
}

/// Tells the owner of a view whether data changed and it should refresh.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Unchanged,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        *self == Mutation::Applied
    }
}
