//! `storefront-core` — shared domain building blocks.
//!
//! Pure domain primitives (no IO): identifiers, prices, the error model and
//! the aggregate/entity/value-object traits used by the catalog and cart
//! crates.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ProductId};
pub use money::Price;
pub use value_object::ValueObject;
