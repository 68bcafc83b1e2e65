use super::{
    AdminError, ConfirmationPrompt, FormOutcome, Mutation, Notification, Notifier,
    ProductDetailView, ProductForm, PRODUCT_DELETED_MESSAGE,
};
use crate::catalog_store::{format_price, Product, ProductStore};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A product as shown in the list, with its latest unit price.
///
/// `current_price` is zero when the product has no history or when its
/// latest price could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub prodcode: String,
    pub description: String,
    pub unit: String,
    pub current_price: Decimal,
}

impl ProductRow {
    pub fn display_price(&self) -> String {
        format_price(&self.current_price)
    }

    pub fn to_product(&self) -> Product {
        Product {
            prodcode: self.prodcode.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
        }
    }

    /// Case-insensitive substring match over every displayed field.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        let price = self.current_price.normalize().to_string();
        [
            self.prodcode.as_str(),
            self.description.as_str(),
            self.unit.as_str(),
            price.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Fetches all products and joins each with its latest price.
///
/// Only the product fetch can fail. A failing latest-price lookup is logged
/// and degrades that row to a zero price.
pub fn load_product_rows(
    store: &dyn ProductStore,
) -> Result<BTreeMap<String, ProductRow>, AdminError> {
    let products = store.list_products()?;
    let mut rows = BTreeMap::new();
    for product in products {
        let current_price = match store.latest_price(&product.prodcode) {
            Ok(Some(entry)) => entry.unitprice,
            Ok(None) => Decimal::ZERO,
            Err(err) => {
                warn!(
                    "Failed to fetch latest price of {}: {}",
                    product.prodcode, err
                );
                Decimal::ZERO
            }
        };
        rows.insert(
            product.prodcode.clone(),
            ProductRow {
                prodcode: product.prodcode,
                description: product.description,
                unit: product.unit,
                current_price,
            },
        );
    }
    debug!("Loaded {} product rows", rows.len());
    Ok(rows)
}

/// Rows matching `query`, in input order. An empty query matches all.
pub fn filter_rows<'a, I>(rows: I, query: &str) -> Vec<&'a ProductRow>
where
    I: IntoIterator<Item = &'a ProductRow>,
{
    let needle = query.to_lowercase();
    rows.into_iter().filter(|row| row.matches(&needle)).collect()
}

/// Deletes a product's whole price history, then the product itself.
///
/// Not atomic: if the product delete fails, the history is already gone.
/// If the history delete fails, the product is not touched.
pub fn delete_product_cascade(store: &dyn ProductStore, prodcode: &str) -> Result<(), AdminError> {
    let removed = store.delete_price_history(prodcode)?;
    debug!("Removed {} price entries of {}", removed, prodcode);
    if !store.delete_product(prodcode)? {
        warn!("Delete of product {} matched no row", prodcode);
    }
    info!("Deleted product {}", prodcode);
    Ok(())
}

/// Dialog currently open on top of the list.
#[derive(Debug)]
pub enum ListDialog {
    Form(ProductForm),
    Detail(ProductDetailView),
}

/// Top-level product list: rows, filter, dialogs and the delete prompt.
#[derive(Debug, Default)]
pub struct ProductListView {
    rows: BTreeMap<String, ProductRow>,
    query: String,
    dialog: Option<ListDialog>,
    delete_prompt: ConfirmationPrompt<String>,
}

impl ProductListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows. On failure the previous rows stay visible.
    pub fn load(&mut self, store: &dyn ProductStore, notifier: &mut dyn Notifier) -> bool {
        match load_product_rows(store) {
            Ok(rows) => {
                self.rows = rows;
                true
            }
            Err(err) => {
                warn!("Failed to load products: {}", err);
                notifier.notify(Notification::error(err.to_string()));
                false
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &ProductRow> {
        self.rows.values()
    }

    pub fn row(&self, prodcode: &str) -> Option<&ProductRow> {
        self.rows.get(prodcode)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn visible_rows(&self) -> Vec<&ProductRow> {
        filter_rows(self.rows.values(), &self.query)
    }

    pub fn dialog(&self) -> Option<&ListDialog> {
        self.dialog.as_ref()
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn open_add_form(&mut self) {
        self.dialog = Some(ListDialog::Form(ProductForm::add()));
    }

    /// Opens the edit form prefilled from the loaded row.
    pub fn open_edit_form(&mut self, prodcode: &str) -> bool {
        match self.rows.get(prodcode) {
            Some(row) => {
                self.dialog = Some(ListDialog::Form(ProductForm::edit(&row.to_product())));
                true
            }
            None => false,
        }
    }

    pub fn product_form(&self) -> Option<&ProductForm> {
        match &self.dialog {
            Some(ListDialog::Form(form)) => Some(form),
            _ => None,
        }
    }

    pub fn product_form_mut(&mut self) -> Option<&mut ProductForm> {
        match &mut self.dialog {
            Some(ListDialog::Form(form)) => Some(form),
            _ => None,
        }
    }

    /// Submits the open product form; on success closes it and reloads.
    pub fn submit_product_form(
        &mut self,
        store: &dyn ProductStore,
        notifier: &mut dyn Notifier,
    ) -> Mutation {
        let Some(form) = self.product_form() else {
            return Mutation::Unchanged;
        };
        match form.submit(store, notifier) {
            FormOutcome::Saved(_) => {
                self.dialog = None;
                self.load(store, notifier);
                Mutation::Applied
            }
            FormOutcome::Rejected => Mutation::Unchanged,
        }
    }

    pub fn open_detail(
        &mut self,
        store: &dyn ProductStore,
        prodcode: &str,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let Some(row) = self.rows.get(prodcode) else {
            return false;
        };
        let view = ProductDetailView::open(store, row.to_product(), notifier);
        self.dialog = Some(ListDialog::Detail(view));
        true
    }

    pub fn detail(&self) -> Option<&ProductDetailView> {
        match &self.dialog {
            Some(ListDialog::Detail(view)) => Some(view),
            _ => None,
        }
    }

    pub fn detail_mut(&mut self) -> Option<&mut ProductDetailView> {
        match &mut self.dialog {
            Some(ListDialog::Detail(view)) => Some(view),
            _ => None,
        }
    }

    /// Submits the detail view's price form, reloading rows on success.
    pub fn submit_price_form(
        &mut self,
        store: &dyn ProductStore,
        notifier: &mut dyn Notifier,
    ) -> Mutation {
        let mutation = match self.detail_mut() {
            Some(view) => view.submit_price_form(store, notifier),
            None => Mutation::Unchanged,
        };
        if mutation.is_applied() {
            self.load(store, notifier);
        }
        mutation
    }

    /// Confirms the detail view's pending price delete, reloading on success.
    pub fn confirm_price_delete(
        &mut self,
        store: &dyn ProductStore,
        notifier: &mut dyn Notifier,
    ) -> Mutation {
        let mutation = match self.detail_mut() {
            Some(view) => view.confirm_delete_price(store, notifier),
            None => Mutation::Unchanged,
        };
        if mutation.is_applied() {
            self.load(store, notifier);
        }
        mutation
    }

    pub fn request_delete(&mut self, prodcode: impl Into<String>) {
        self.delete_prompt.arm(prodcode.into());
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.delete_prompt.pending().map(String::as_str)
    }

    pub fn cancel_delete(&mut self) {
        self.delete_prompt.cancel();
    }

    pub fn confirm_delete(
        &mut self,
        store: &dyn ProductStore,
        notifier: &mut dyn Notifier,
    ) -> Mutation {
        let Some(prodcode) = self.delete_prompt.confirm() else {
            return Mutation::Unchanged;
        };
        match delete_product_cascade(store, &prodcode) {
            Ok(()) => {
                notifier.notify(Notification::success(PRODUCT_DELETED_MESSAGE));
                self.load(store, notifier);
                Mutation::Applied
            }
            Err(err) => {
                notifier.notify(Notification::error(err.to_string()));
                Mutation::Unchanged
            }
        }
    }
}
