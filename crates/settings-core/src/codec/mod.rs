//! Byte-level representation of the settings value.
//!
//! - [`adapters`] teaches serde the immutable containers.
//! - [`json`] encodes and decodes the whole [`crate::Settings`] document.
//! - [`serializer`] is the trait a store uses to stay format-agnostic.

pub mod adapters;
pub mod json;
pub mod serializer;

pub use adapters::{PERSISTENT_LIST_NAME, PERSISTENT_MAP_NAME};
pub use json::{decode_settings, encode_settings, CodecError};
pub use serializer::{CorruptDataError, SettingsSerializer, ValueSerializer};
