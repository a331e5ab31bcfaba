//! Cart and wishlist domain logic.
//!
//! Pure decision logic (no IO). Persisting cart rows against the hosted
//! backend is done by the caller from the emitted events.

pub mod cart;
pub mod wishlist;

pub use cart::{
    AddToCart, Cart, CartCommand, CartEvent, CartLine, ItemAdded, ItemRemoved, QuantityIncreased,
    QuantityUpdated, RemoveFromCart, UpdateQuantity,
};
pub use wishlist::{Wishlist, WishlistItem};
