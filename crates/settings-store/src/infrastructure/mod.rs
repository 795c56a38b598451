//! Infrastructure layer for the settings store.
//!
//! Contains the OS-facing adapters: the blob storage the store persists to
//! and the resolution of where that blob lives.
//!
//! **Dependency rule**: this layer may depend on `settings_core`, but MUST NOT
//! be imported by the domain layer.

pub mod storage;
