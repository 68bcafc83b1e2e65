use super::{
    ConfirmationPrompt, FormOutcome, Mutation, Notification, Notifier, PriceHistoryForm,
    PRICE_DELETED_MESSAGE,
};
use crate::catalog_store::{PriceEntry, Product, ProductStore};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Read-only view of one product with its price history, newest first.
///
/// Owns the price form and the price delete prompt. Every successful price
/// mutation refreshes the history and is reported as `Mutation::Applied` so
/// the owner can refresh the list's latest prices too.
#[derive(Debug)]
pub struct ProductDetailView {
    product: Product,
    history: Vec<PriceEntry>,
    price_form: Option<PriceHistoryForm>,
    delete_prompt: ConfirmationPrompt<NaiveDate>,
}

impl ProductDetailView {
    pub const TITLE: &'static str = "View Product";

    pub fn open(store: &dyn ProductStore, product: Product, notifier: &mut dyn Notifier) -> Self {
        let mut view = Self {
            product,
            history: Vec::new(),
            price_form: None,
            delete_prompt: ConfirmationPrompt::new(),
        };
        view.refresh(store, notifier);
        view
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn history(&self) -> &[PriceEntry] {
        &self.history
    }

    /// Reloads the history. On failure the previous history stays visible.
    pub fn refresh(&mut self, store: &dyn ProductStore, notifier: &mut dyn Notifier) -> bool {
        match store.list_price_history(&self.product.prodcode) {
            Ok(history) => {
                self.history = history;
                true
            }
            Err(err) => {
                warn!(
                    "Failed to load price history of {}: {}",
                    self.product.prodcode, err
                );
                notifier.notify(Notification::error(err.to_string()));
                false
            }
        }
    }

    pub fn open_add_price(&mut self) {
        self.price_form = Some(PriceHistoryForm::add(self.product.prodcode.clone()));
    }

    /// Returns false if no loaded entry has that date.
    pub fn open_edit_price(&mut self, effdate: NaiveDate) -> bool {
        match self.history.iter().find(|e| e.effdate == effdate) {
            Some(entry) => {
                self.price_form = Some(PriceHistoryForm::edit(entry));
                true
            }
            None => false,
        }
    }

    pub fn price_form(&self) -> Option<&PriceHistoryForm> {
        self.price_form.as_ref()
    }

    pub fn price_form_mut(&mut self) -> Option<&mut PriceHistoryForm> {
        self.price_form.as_mut()
    }

    pub fn close_price_form(&mut self) {
        self.price_form = None;
    }

    /// Submits the open price form. The form closes only on success.
    pub fn submit_price_form(
        &mut self,
        store: &dyn ProductStore,
        notifier: &mut dyn Notifier,
    ) -> Mutation {
        let Some(form) = &self.price_form else {
            return Mutation::Unchanged;
        };
        match form.submit(store, notifier) {
            FormOutcome::Saved(_) => {
                self.price_form = None;
                self.refresh(store, notifier);
                Mutation::Applied
            }
            FormOutcome::Rejected => Mutation::Unchanged,
        }
    }

    pub fn request_delete_price(&mut self, effdate: NaiveDate) {
        self.delete_prompt.arm(effdate);
    }

    pub fn pending_delete(&self) -> Option<&NaiveDate> {
        self.delete_prompt.pending()
    }

    pub fn cancel_delete_price(&mut self) {
        self.delete_prompt.cancel();
    }

    pub fn confirm_delete_price(
        &mut self,
        store: &dyn ProductStore,
        notifier: &mut dyn Notifier,
    ) -> Mutation {
        let Some(effdate) = self.delete_prompt.confirm() else {
            return Mutation::Unchanged;
        };
        match store.delete_price(&self.product.prodcode, effdate) {
            Ok(_) => {
                info!(
                    "Deleted price of {} effective {}",
                    self.product.prodcode, effdate
                );
                notifier.notify(Notification::success(PRICE_DELETED_MESSAGE));
                self.refresh(store, notifier);
                Mutation::Applied
            }
            Err(err) => {
                notifier.notify(Notification::error(err.to_string()));
                Mutation::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::test_support::{date, price, product, FaultyStore, Op};
    use crate::admin::NotificationLog;

    fn seeded() -> FaultyStore {
        let store = FaultyStore::new();
        store.insert_product(&product("P1", "Widget", "pc")).unwrap();
        store.insert_price(&price("P1", "2024-01-01", "10")).unwrap();
        store.insert_price(&price("P1", "2024-06-01", "15")).unwrap();
        store
    }

    #[test]
    fn opens_with_history_newest_first() {
        let store = seeded();
        let mut log = NotificationLog::new();
        let view = ProductDetailView::open(&store, product("P1", "Widget", "pc"), &mut log);

        let dates: Vec<_> = view.history().iter().map(|e| e.effdate).collect();
        assert_eq!(dates, vec![date("2024-06-01"), date("2024-01-01")]);
        assert!(log.is_empty());
    }

    #[test]
    fn failed_history_load_notifies() {
        let store = seeded();
        store.fail(Op::ListPriceHistory);
        let mut log = NotificationLog::new();
        let view = ProductDetailView::open(&store, product("P1", "Widget", "pc"), &mut log);

        assert!(view.history().is_empty());
        assert_eq!(
            log.last(),
            Some(&Notification::error("simulated ListPriceHistory failure"))
        );
    }

    #[test]
    fn adding_price_refreshes_history() {
        let store = seeded();
        let mut log = NotificationLog::new();
        let mut view = ProductDetailView::open(&store, product("P1", "Widget", "pc"), &mut log);

        view.open_add_price();
        let form = view.price_form_mut().unwrap();
        form.set_effdate("2025-01-01");
        form.set_unitprice("20");

        assert_eq!(view.submit_price_form(&store, &mut log), Mutation::Applied);
        assert!(view.price_form().is_none());
        assert_eq!(view.history().len(), 3);
        assert_eq!(view.history()[0], price("P1", "2025-01-01", "20"));
    }

    #[test]
    fn rejected_form_stays_open() {
        let store = seeded();
        let mut log = NotificationLog::new();
        let mut view = ProductDetailView::open(&store, product("P1", "Widget", "pc"), &mut log);

        view.open_add_price();
        assert_eq!(view.submit_price_form(&store, &mut log), Mutation::Unchanged);
        assert!(view.price_form().is_some());
        assert_eq!(store.count_calls(Op::InsertPrice), 0);
    }

    #[test]
    fn edit_price_uses_loaded_entry() {
        let store = seeded();
        let mut log = NotificationLog::new();
        let mut view = ProductDetailView::open(&store, product("P1", "Widget", "pc"), &mut log);

        assert!(!view.open_edit_price(date("2023-01-01")));
        assert!(view.open_edit_price(date("2024-06-01")));
        view.price_form_mut().unwrap().set_unitprice("16");
        assert_eq!(view.submit_price_form(&store, &mut log), Mutation::Applied);
        assert_eq!(view.history()[0], price("P1", "2024-06-01", "16"));
    }

    #[test]
    fn price_delete_requires_confirmation() {
        let store = seeded();
        let mut log = NotificationLog::new();
        let mut view = ProductDetailView::open(&store, product("P1", "Widget", "pc"), &mut log);

        view.request_delete_price(date("2024-06-01"));
        view.cancel_delete_price();
        assert_eq!(view.confirm_delete_price(&store, &mut log), Mutation::Unchanged);
        assert_eq!(store.count_calls(Op::DeletePrice), 0);

        view.request_delete_price(date("2024-06-01"));
        assert_eq!(view.pending_delete(), Some(&date("2024-06-01")));
        assert_eq!(view.confirm_delete_price(&store, &mut log), Mutation::Applied);
        assert_eq!(view.history(), &[price("P1", "2024-01-01", "10")]);
        assert_eq!(
            log.last(),
            Some(&Notification::success("Price deleted successfully"))
        );
    }

    #[test]
    fn failed_price_delete_keeps_history() {
        let store = seeded();
        store.fail(Op::DeletePrice);
        let mut log = NotificationLog::new();
        let mut view = ProductDetailView::open(&store, product("P1", "Widget", "pc"), &mut log);

        view.request_delete_price(date("2024-06-01"));
        assert_eq!(view.confirm_delete_price(&store, &mut log), Mutation::Unchanged);
        assert_eq!(view.history().len(), 2);
        assert!(log.last().unwrap().is_error());
    }
}
