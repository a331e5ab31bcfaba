use serde::{Deserialize, Serialize};

use storefront_core::{Entity, Price, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub image_url: Option<String>,
}

impl Entity for WishlistItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

/// Saved-for-later products, in the order they were saved, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| *i.id() == product_id)
    }

    /// Returns `false` (and keeps the existing entry) if the product is already saved.
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Returns whether the product was saved.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| *i.id() != product_id);
        self.items.len() != before
    }
}
