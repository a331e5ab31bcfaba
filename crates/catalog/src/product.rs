use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Entity, Price, ProductId};

/// Categories offered in the storefront sidebar.
///
/// The set of categories a record may carry is open; this table only drives
/// the filter checkboxes. A selected name that no record carries matches
/// nothing.
pub const CATEGORIES: [&str; 6] = [
    "Electronics",
    "Fashion",
    "Home & Garden",
    "Sports",
    "Beauty",
    "Books",
];

/// One row of the catalog snapshot, as supplied by a catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    /// Empty when the hosted row has no description.
    pub description: String,
    /// Minor units (cents).
    pub price: Price,
    pub category: String,
    pub stock: u32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Price,
        stock: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            stock,
            image_url: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl Entity for ProductRecord {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
