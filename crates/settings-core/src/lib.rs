//! # settings-core
//!
//! Shared library for the settings store containing the persisted settings
//! model, the immutable containers it is made of, and the JSON codec.
//!
//! It performs no I/O; the `settings-store` crate owns the file and the
//! update discipline.
//!
//! # Overview
//!
//! - **`domain`** – The [`Settings`] value (language, known locations, theme
//!   settings) and the [`PersistentList`] / [`PersistentMap`] containers.
//!   "Changing" a value always produces a new one.
//!
//! - **`codec`** – Serde adapters for the two containers, the JSON encoding
//!   of the whole document, and the [`ValueSerializer`] trait a store is
//!   generic over.

pub mod codec;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `settings_core::Settings` instead of `settings_core::domain::settings::Settings`.
pub use codec::{
    decode_settings, encode_settings, CodecError, CorruptDataError, SettingsSerializer,
    ValueSerializer,
};
pub use domain::persistent::{PersistentList, PersistentMap};
pub use domain::settings::{
    Language, Location, ParseLanguageError, Settings, ThemeSetting, ThemeSettings,
};
