//! Domain types for the settings store.
//!
//! Pure value types with no I/O: the [`settings::Settings`] root and the
//! immutable containers it is built from.  The storage crate depends on
//! this module; this module never depends on storage.

/// Immutable list and map with structural sharing.
pub mod persistent;

/// The persisted settings value.
pub mod settings;
