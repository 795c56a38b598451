//! The seam between a stored value and its byte representation.
//!
//! A store is generic over a [`ValueSerializer`]: it knows the value's
//! default, how to read it back from bytes, and how to write it.  Reading
//! reports [`CorruptDataError`] rather than a bare codec error so that the
//! store can treat every variant of bad input the same way.

use thiserror::Error;
use tracing::trace;

use super::json::{decode_settings, encode_settings, CodecError};
use crate::domain::settings::Settings;

/// The stored bytes could not be turned into a value.
#[derive(Debug, Error)]
#[error("stored data is corrupt: {0}")]
pub struct CorruptDataError(#[from] pub CodecError);

/// Converts a value of type `T` to and from bytes.
pub trait ValueSerializer<T>: Send + Sync {
    /// The value used when nothing is stored or the stored bytes are corrupt.
    fn default_value(&self) -> T;

    /// Decodes a stored value.
    fn read_from(&self, bytes: &[u8]) -> Result<T, CorruptDataError>;

    /// Encodes a value for storage.
    fn write_to(&self, value: &T) -> Result<Vec<u8>, CodecError>;
}

/// JSON serializer for [`Settings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsSerializer;

impl ValueSerializer<Settings> for SettingsSerializer {
    fn default_value(&self) -> Settings {
        Settings::default()
    }

    fn read_from(&self, bytes: &[u8]) -> Result<Settings, CorruptDataError> {
        trace!(len = bytes.len(), "decoding settings");
        Ok(decode_settings(bytes)?)
    }

    fn write_to(&self, value: &Settings) -> Result<Vec<u8>, CodecError> {
        let bytes = encode_settings(value)?;
        trace!(len = bytes.len(), "encoded settings");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::Language;

    #[test]
    fn test_default_value_is_settings_default() {
        assert_eq!(SettingsSerializer.default_value(), Settings::default());
    }

    #[test]
    fn test_read_from_wraps_codec_error_as_corrupt() {
        let err = SettingsSerializer.read_from(b"{not json").unwrap_err();
        assert!(matches!(err.0, CodecError::Decode(_)));
        assert!(err.to_string().starts_with("stored data is corrupt"));
    }

    #[test]
    fn test_write_then_read_returns_same_value() {
        let value = Settings::default().with_language(Language::German);
        let bytes = SettingsSerializer.write_to(&value).unwrap();
        assert_eq!(SettingsSerializer.read_from(&bytes).unwrap(), value);
    }
}
