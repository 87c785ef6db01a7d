//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects defined entirely by their attribute
//! values. Two value objects with the same values are equal; to "modify" one,
//! build a new one. Catalog snapshots, recipe lines and consensus outcomes
//! are all values in this sense.

/// Marker trait for value objects.
///
/// Requires `Clone` (values are cheap to copy), `PartialEq` (compared by
/// value) and `Debug` (loggable in tests and traces).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
