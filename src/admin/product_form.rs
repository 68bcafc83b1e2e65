use super::{AdminError, FormOutcome, Notification, Notifier, SaveKind};
use crate::catalog_store::{Product, ProductStore};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFormMode {
    Add,
    /// Editing the product currently stored under `original_prodcode`.
    Edit { original_prodcode: String },
}

/// Add/edit form for a single product.
///
/// In edit mode the product code is locked to the original one.
#[derive(Debug, Clone)]
pub struct ProductForm {
    mode: ProductFormMode,
    prodcode: String,
    description: String,
    unit: String,
}

impl ProductForm {
    pub fn add() -> Self {
        Self {
            mode: ProductFormMode::Add,
            prodcode: String::new(),
            description: String::new(),
            unit: String::new(),
        }
    }

    pub fn edit(existing: &Product) -> Self {
        Self {
            mode: ProductFormMode::Edit {
                original_prodcode: existing.prodcode.clone(),
            },
            prodcode: existing.prodcode.clone(),
            description: existing.description.clone(),
            unit: existing.unit.clone(),
        }
    }

    pub fn mode(&self) -> &ProductFormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, ProductFormMode::Edit { .. })
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            ProductFormMode::Add => "Add Product",
            ProductFormMode::Edit { .. } => "Edit Product",
        }
    }

    pub fn prodcode(&self) -> &str {
        &self.prodcode
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns false, leaving the field untouched, when the code is locked.
    pub fn set_prodcode(&mut self, value: impl Into<String>) -> bool {
        if self.is_editing() {
            return false;
        }
        self.prodcode = value.into();
        true
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    pub fn set_unit(&mut self, value: impl Into<String>) {
        self.unit = value.into();
    }

    /// Builds the product to persist. Fields are only checked for emptiness.
    pub fn validate(&self) -> Result<Product, AdminError> {
        let prodcode = match &self.mode {
            ProductFormMode::Add => self.prodcode.clone(),
            ProductFormMode::Edit { original_prodcode } => original_prodcode.clone(),
        };
        if prodcode.is_empty() || self.description.is_empty() || self.unit.is_empty() {
            return Err(AdminError::MissingFields);
        }
        Ok(Product {
            prodcode,
            description: self.description.clone(),
            unit: self.unit.clone(),
        })
    }

    /// Validates and writes to the store. Nothing is sent when validation
    /// fails. An update matching no row still counts as a save.
    pub fn save(&self, store: &dyn ProductStore) -> Result<SaveKind, AdminError> {
        let product = self.validate()?;
        match &self.mode {
            ProductFormMode::Add => {
                store.insert_product(&product)?;
                info!("Added product {}", product.prodcode);
                Ok(SaveKind::Added)
            }
            ProductFormMode::Edit { original_prodcode } => {
                if !store.update_product(original_prodcode, &product)? {
                    warn!("Update of product {} matched no row", original_prodcode);
                }
                info!("Updated product {}", product.prodcode);
                Ok(SaveKind::Updated)
            }
        }
    }

    pub fn success_message(kind: SaveKind) -> &'static str {
        match kind {
            SaveKind::Added => "Product added successfully",
            SaveKind::Updated => "Product updated successfully",
        }
    }

    /// Saves and raises the matching notification.
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
