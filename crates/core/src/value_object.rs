//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are immutable: `Price`, a price range,
/// or a filter state are equal exactly when their fields are equal. To
/// "modify" one, build a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
