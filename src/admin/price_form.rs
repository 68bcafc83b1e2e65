use super::{AdminError, FormOutcome, Notification, Notifier, SaveKind};
use crate::catalog_store::{PriceEntry, ProductStore, EFFDATE_FORMAT};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFormMode {
    Add,
    /// Editing the entry stored at `original_effdate`. The date is locked,
    /// re-dating an entry means deleting it and adding a new one.
    Edit { original_effdate: NaiveDate },
}

/// Add/edit form for one price-history entry of a fixed product.
#[derive(Debug, Clone)]
pub struct PriceHistoryForm {
    prodcode: String,
    mode: PriceFormMode,
    effdate: String,
    unitprice: String,
}

impl PriceHistoryForm {
    pub fn add(prodcode: impl Into<String>) -> Self {
        Self {
            prodcode: prodcode.into(),
            mode: PriceFormMode::Add,
            effdate: String::new(),
            unitprice: String::new(),
        }
    }

    pub fn edit(entry: &PriceEntry) -> Self {
        Self {
            prodcode: entry.prodcode.clone(),
            mode: PriceFormMode::Edit {
                original_effdate: entry.effdate,
            },
            effdate: entry.effdate.format(EFFDATE_FORMAT).to_string(),
            unitprice: entry.unitprice.to_string(),
        }
    }

    pub fn mode(&self) -> PriceFormMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, PriceFormMode::Edit { .. })
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            PriceFormMode::Add => "Add Price History",
            PriceFormMode::Edit { .. } => "Edit Price History",
        }
    }

    pub fn prodcode(&self) -> &str {
        &self.prodcode
    }

    pub fn effdate(&self) -> &str {
        &self.effdate
    }

    pub fn unitprice(&self) -> &str {
        &self.unitprice
    }

    /// Returns false, leaving the field untouched, when the date is locked.
    pub fn set_effdate(&mut self, value: impl Into<String>) -> bool {
        if self.is_editing() {
            return false;
        }
        self.effdate = value.into();
        true
    }

    pub fn set_unitprice(&mut self, value: impl Into<String>) {
        self.unitprice = value.into();
    }

    pub fn validate(&self) -> Result<PriceEntry, AdminError> {
        if self.effdate.is_empty() || self.unitprice.is_empty() {
            return Err(AdminError::MissingFields);
        }
        let effdate = match self.mode {
            PriceFormMode::Edit { original_effdate } => original_effdate,
            PriceFormMode::Add => NaiveDate::parse_from_str(self.effdate.trim(), EFFDATE_FORMAT)
                .map_err(|_| AdminError::InvalidDate(self.effdate.clone()))?,
        };
        let unitprice = Decimal::from_str(self.unitprice.trim())
            .map_err(|_| AdminError::InvalidPrice(self.unitprice.clone()))?;
        Ok(PriceEntry {
            prodcode: self.prodcode.clone(),
            effdate,
            unitprice,
        })
    }

    pub fn save(&self, store: &dyn ProductStore) -> Result<SaveKind, AdminError> {
        let entry = self.validate()?;
        match self.mode {
            PriceFormMode::Add => {
                store.insert_price(&entry)?;
                info!(
                    "Added price {} for {} effective {}",
                    entry.unitprice, entry.prodcode, entry.effdate
                );
                Ok(SaveKind::Added)
            }
            PriceFormMode::Edit { original_effdate } => {
                if !store.update_price(&self.prodcode, original_effdate, &entry)? {
                    warn!(
                        "Update of price {} {} matched no row",
                        self.prodcode, original_effdate
                    );
                }
                info!(
                    "Updated price of {} effective {} to {}",
                    entry.prodcode, entry.effdate, entry.unitprice
                );
                Ok(SaveKind::Updated)
            }
        }
    }

    pub fn success_message(kind: SaveKind) -> &'static str {
        match kind {
            SaveKind::Added => "Price added successfully",
            SaveKind::Updated => "Price updated successfully",
        }
    }

    pub fn submit(&self, store: &dyn ProductStore, notifier: &mut dyn Notifier) -> FormOutcome {
        match self.save(store) {
            Ok(kind) => {
                notifier.notify(Notification::success(Self::success_message(kind)));
                FormOutcome::Saved(kind)
            }
            Err(err) => {
                notifier.notify(Notification::error(err.to_string()));
                FormOutcome::Rejected
            }
        }
    }
}
