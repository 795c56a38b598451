//! JSON encoding of [`Settings`].
//!
//! The encoding is compact UTF-8 JSON.  Decoding is lenient about shape
//! (missing keys default, unknown keys are ignored) and strict about values
//! (an unknown language literal or a wrongly typed field is an error).

use thiserror::Error;

use crate::domain::settings::Settings;

/// Errors produced while encoding or decoding settings.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes are not a valid settings document.  This also carries any
    /// element or entry failure raised by the container adapters.
    #[error("failed to decode settings: {0}")]
    Decode(#[source] serde_json::Error),

    /// The value could not be serialized.
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),

    /// The bytes are not UTF-8.
    #[error("settings payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A location coordinate is NaN or infinite and has no JSON form.
    #[error("location #{index} has a non-finite coordinate ({lat}, {lng})")]
    NonFiniteCoordinate { index: usize, lat: f64, lng: f64 },
}

/// Encodes `settings` as compact UTF-8 JSON.
///
/// # Errors
///
/// Returns [`CodecError::NonFiniteCoordinate`] if any known location has a NaN
/// or infinite coordinate, and [`CodecError::Encode`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use settings_core::{decode_settings, encode_settings, Language, Settings};
///
/// let settings = Settings::default().with_language(Language::German);
/// let bytes = encode_settings(&settings).unwrap();
/// assert_eq!(decode_settings(&bytes).unwrap(), settings);
/// ```
pub fn encode_settings(settings: &Settings) -> Result<Vec<u8>, CodecError> {
    if let Some((index, location)) = settings
        .known_locations
        .iter()
        .enumerate()
        .find(|(_, location)| !location.is_finite())
    {
        return Err(CodecError::NonFiniteCoordinate {
            index,
            lat: location.lat,
            lng: location.lng,
        });
    }
    serde_json::to_vec(settings).map_err(CodecError::Encode)
}

/// Decodes a settings document.
///
/// # Errors
///
/// Returns [`CodecError::InvalidUtf8`] if `bytes` is not UTF-8 and
/// [`CodecError::Decode`] if the JSON is malformed or does not match the
/// settings schema.
pub fn decode_settings(bytes: &[u8]) -> Result<Settings, CodecError> {
    let text = std::str::from_utf8(bytes)?;
    serde_json::from_str(text).map_err(CodecError::Decode)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
