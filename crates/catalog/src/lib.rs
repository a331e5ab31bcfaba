//! Product catalog view engine.
//!
//! Pure, synchronous filtering, sorting, and pagination of an in-memory
//! catalog snapshot (no HTTP, no storage). Snapshots come from a
//! [`CatalogProvider`]; the rendering layer consumes [`ViewResult`].

pub mod config;
pub mod filter;
pub mod pagination;
pub mod product;
pub mod provider;
pub mod sort;
pub mod view;

pub use config::{CatalogConfig, ConfigError};
pub use filter::{FilterPatch, FilterState, PriceBucket, PriceRange, apply_filters};
pub use pagination::{
    DEFAULT_PAGE_SIZE, PageButton, PageState, build_page_buttons, paginate, total_pages,
};
pub use product::{CATEGORIES, ProductRecord};
pub use provider::{
    CatalogProvider, FetchError, InMemoryCatalogProvider, JsonCatalogProvider, ensure_unique_ids,
    parse_catalog,
};
pub use sort::{SortKey, sort_products};
pub use view::{CatalogView, LoadState, ViewResult};
