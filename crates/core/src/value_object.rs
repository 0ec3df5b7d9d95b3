//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two `Quantity(3)` are the
/// same quantity, two item-form pairs with the same spellings are the same pair. To
/// "modify" one, build a new one.
///
/// The trait requires `Clone`, `PartialEq` and `Debug` so values can be copied into
/// mutation plans, compared in tests and logged.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Quantity(u64);
///
/// impl ValueObject for Quantity {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
