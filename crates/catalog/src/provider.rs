//! Catalog providers: where snapshots come from.
//!
//! The view engine never talks to the hosted backend itself. It asks a
//! [`CatalogProvider`] for a full snapshot and either installs it or records
//! the [`FetchError`]. Retrying and caching belong to the provider.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use storefront_core::{Entity, Price, ProductId};

use crate::product::ProductRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("catalog provider unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read catalog: {0}")]
    Io(String),

    #[error("malformed catalog document: {0}")]
    Malformed(String),

    #[error("invalid product record {id}: {reason}")]
    InvalidRecord { id: ProductId, reason: String },

    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// Source of catalog snapshots.
pub trait CatalogProvider {
    fn fetch_catalog(&self) -> Result<Vec<ProductRecord>, FetchError>;
}

impl<P> CatalogProvider for Arc<P>
where
    P: CatalogProvider + ?Sized,
{
    fn fetch_catalog(&self) -> Result<Vec<ProductRecord>, FetchError> {
        (**self).fetch_catalog()
    }
}

/// Provider backed by a fixed snapshot (or a fixed failure), for tests/dev.
#[derive(Debug, Clone)]
pub struct InMemoryCatalogProvider {
    outcome: Result<Vec<ProductRecord>, FetchError>,
}

impl InMemoryCatalogProvider {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self {
            outcome: Ok(records),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl CatalogProvider for InMemoryCatalogProvider {
    fn fetch_catalog(&self) -> Result<Vec<ProductRecord>, FetchError> {
        let records = self.outcome.clone()?;
        ensure_unique_ids(&records)?;
        Ok(records)
    }
}

/// Reads a JSON export of the hosted `products` table from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonCatalogProvider {
    path: PathBuf,
}

impl JsonCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogProvider for JsonCatalogProvider {
    fn fetch_catalog(&self) -> Result<Vec<ProductRecord>, FetchError> {
        let body = std::fs::read_to_string(&self.path)
            .map_err(|e| FetchError::Io(format!("{}: {e}", self.path.display())))?;
        let records = parse_catalog(&body)?;
        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "catalog document parsed"
        );
        Ok(records)
    }
}

/// Row shape of the hosted table. Prices are decimal major units.
#[derive(Debug, Deserialize)]
struct ProductRow {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: f64,
    category: String,
    #[serde(default)]
    stock: i64,
    #[serde(default)]
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRow> for ProductRecord {
    type Error = FetchError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = ProductId::new(row.id);
        let invalid = |reason: String| FetchError::InvalidRecord { id, reason };

        let price = Price::from_decimal(row.price).map_err(|e| invalid(e.to_string()))?;
        let stock = u32::try_from(row.stock)
            .map_err(|_| invalid(format!("stock out of range: {}", row.stock)))?;

        Ok(ProductRecord {
            id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            price,
            category: row.category,
            stock,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at.unwrap_or(row.created_at),
        })
    }
}

/// Parse a JSON array of product rows into a validated snapshot.
pub fn parse_catalog(json: &str) -> Result<Vec<ProductRecord>, FetchError> {
    let rows: Vec<ProductRow> =
        serde_json::from_str(json).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let records = rows
        .into_iter()
        .map(ProductRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    ensure_unique_ids(&records)?;
    Ok(records)
}

/// A snapshot must not repeat an id: ids break every sort tie.
pub fn ensure_unique_ids(records: &[ProductRecord]) -> Result<(), FetchError> {
    let mut seen = HashSet::with_capacity(records.len());
    match records.iter().map(Entity::id).find(|id| !seen.insert(**id)) {
        Some(id) => Err(FetchError::DuplicateId(*id)),
        None => Ok(()),
    }
}
