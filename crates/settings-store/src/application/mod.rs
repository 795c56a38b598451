//! Application layer for the settings store.
//!
//! Contains the store itself and the named transforms the front-end applies
//! through it:
//!
//! - `data_store`: `DataStore` – read, write, observe, and atomic update of
//!   one persisted value.
//! - `actions`: settings transforms (language selection, locations, themes).
//!
//! **Dependency rule**: this layer depends on `settings_core` for the value
//! types and on the `BlobStore` seam only; it never names a concrete storage
//! backend.

pub mod actions;
pub mod data_store;
