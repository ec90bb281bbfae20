//! Client-side state: the signed-in session and the shopping cart.
//!
//! Each store owns its in-memory state and mirrors it to a named record in
//! [`DurableStorage`](crate::storage::DurableStorage). A store hydrates once
//! when constructed; after that storage only follows memory.
//!
//! Mutations persist first and commit to memory only when the write
//! succeeded, so a failed write leaves both sides at the previous state.

mod cart;
mod session;

pub use cart::{CartItem, PersistentCart};
pub use session::PersistentSession;

use kube_ec_core::ProductId;

use crate::api::{AccessToken, Product, User};
use crate::storage::StorageError;

/// The signed-in user and their bearer token.
pub trait SessionStore: Send {
    /// The signed-in user, if any.
    fn user(&self) -> Option<&User>;

    /// The bearer token of the signed-in user, if any.
    fn access_token(&self) -> Option<&AccessToken>;

    /// Replace the user and token.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    fn set_auth(&mut self, user: User, token: AccessToken) -> Result<(), StorageError>;

    /// Replace the user's profile, keeping the token. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    fn set_user(&mut self, user: User) -> Result<(), StorageError>;

    /// Forget the user and token locally. No server call is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable record cannot be removed.
    fn logout(&mut self) -> Result<(), StorageError>;

    /// Whether both a user and a token are present.
    fn is_authenticated(&self) -> bool {
        self.credentials().is_some()
    }

    /// The user and token together, when signed in.
    fn credentials(&self) -> Option<(&User, &AccessToken)> {
        self.user().zip(self.access_token())
    }
}

/// Ordered cart lines, unique by product id.
pub trait CartStore: Send {
    /// Lines in insertion order.
    fn items(&self) -> &[CartItem];

    /// Add `quantity` units. An existing line for the same product is
    /// incremented; otherwise a new line is appended. Stock is not checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    fn add_item(&mut self, product: Product, quantity: u32) -> Result<(), StorageError>;

    /// Remove the line for a product. Missing lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    fn remove_item(&mut self, product_id: &ProductId) -> Result<(), StorageError>;

    /// Replace the quantity of a line. Missing lines are ignored; the value
    /// is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StorageError>;

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    fn clear_cart(&mut self) -> Result<(), StorageError>;

    /// The line for a product, if present.
    fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items().iter().find(|item| &item.product.id == product_id)
    }

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Sum of `unit price * quantity` over all lines, in the smallest
    /// currency unit. A single currency is assumed.
    fn total_price(&self) -> i64 {
        self.items()
            .iter()
            .map(CartItem::line_total)
            .fold(0, i64::saturating_add)
    }

    /// Sum of quantities, shown as the cart badge.
    fn total_items(&self) -> u32 {
        self.items()
            .iter()
            .map(|item| item.quantity)
            .fold(0, u32::saturating_add)
    }
}
