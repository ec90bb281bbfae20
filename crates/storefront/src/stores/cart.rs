use std::sync::Arc;

use kube_ec_core::ProductId;
use serde::{Deserialize, Serialize};

use super::CartStore;
use crate::api::Product;
use crate::storage::{CART_RECORD, DurableStorage, StorageError, load_json, save_json};

/// A product and the number of units selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity, saturating.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.product
            .price
            .amount
            .saturating_mul(i64::from(self.quantity))
    }
}

#[derive(Serialize, Deserialize)]
struct CartRecord {
    items: Vec<CartItem>,
}

/// Cart mirrored to the `cart-storage` record.
pub struct PersistentCart {
    items: Vec<CartItem>,
    storage: Arc<dyn DurableStorage>,
}

impl PersistentCart {
    /// Hydrate the cart from storage.
    ///
    /// An unreadable or corrupt record is discarded and the cart starts empty.
    #[must_use]
    pub fn load(storage: Arc<dyn DurableStorage>) -> Self {
        let items = match load_json::<CartRecord>(storage.as_ref(), CART_RECORD) {
            Ok(Some(record)) => record.items,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cart record");
                Vec::new()
            }
        };
        tracing::debug!(lines = items.len(), "Cart hydrated");

        Self { items, storage }
    }

    /// Persist `next` and make it the current state.
    fn commit(&mut self, next: Vec<CartItem>) -> Result<(), StorageError> {
        let record = CartRecord { items: next };
        save_json(self.storage.as_ref(), CART_RECORD, &record)?;
        self.items = record.items;
        Ok(())
    }
}

impl CartStore for PersistentCart {
    fn items(&self) -> &[CartItem] {
        &self.items
    }

    fn add_item(&mut self, product: Product, quantity: u32) -> Result<(), StorageError> {
        let mut next = self.items.clone();
        match next.iter_mut().find(|item| item.product.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => next.push(CartItem { product, quantity }),
        }
        self.commit(next)
    }

    fn remove_item(&mut self, product_id: &ProductId) -> Result<(), StorageError> {
        if self.get(product_id).is_none() {
            return Ok(());
        }
        let next = self
            .items
            .iter()
            .filter(|item| &item.product.id != product_id)
            .cloned()
            .collect();
        self.commit(next)
    }

    fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StorageError> {
        if self.get(product_id).is_none() {
            return Ok(());
        }
        let mut next = self.items.clone();
        for item in &mut next {
            if &item.product.id == product_id {
                item.quantity = quantity;
            }
        }
        self.commit(next)
    }

    fn clear_cart(&mut self) -> Result<(), StorageError> {
        self.commit(Vec::new())
    }
}
