//! The persisted settings value and its parts.
//!
//! [`Settings`] is always a total value: every field has a default, and
//! decoding a document with missing keys fills them in.  Field names on the
//! wire are fixed by the `#[serde(rename = ...)]` attributes below:
//!
//! ```json
//! {
//!   "language": "GERMAN",
//!   "knownLocations": [{ "lat": 0.25, "lng": 0.75 }],
//!   "themeSettingsMap": {
//!     "ProtoDSGuide": { "id": "DoesItWork?", "title": "MapSerialization", "isEnabled": true }
//!   }
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::persistent::{PersistentList, PersistentMap};

/// The user's language preference.  Closed set; any other literal on the
/// wire is a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    #[default]
    English,
    German,
    Spanish,
}

impl Language {
    /// Every language, in declaration order.
    pub const ALL: [Language; 3] = [Language::English, Language::German, Language::Spanish];

    /// The wire literal for this language (`"ENGLISH"`, `"GERMAN"`, `"SPANISH"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "ENGLISH",
            Language::German => "GERMAN",
            Language::Spanish => "SPANISH",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`Language`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown language {0:?} (expected one of ENGLISH, GERMAN, SPANISH)")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    /// Parses the wire literal, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLanguageError(s.to_string()))
    }
}

/// A geographic point.  Coordinates are not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both coordinates are finite (JSON cannot carry NaN or ±∞).
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// A named theme toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSetting {
    pub id: String,
    pub title: String,
    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,
}

impl ThemeSetting {
    pub fn new(id: impl Into<String>, title: impl Into<String>, is_enabled: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_enabled,
        }
    }
}

/// Theme settings keyed by an opaque name.
pub type ThemeSettings = PersistentMap<String, ThemeSetting>;

/// The single persisted root value.
///
/// Values are immutable in practice: the `with_*` methods consume `self` and
/// return a copy with one field replaced.  Because the containers share
/// structure, such copies are cheap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    #[serde(rename = "knownLocations")]
    pub known_locations: PersistentList<Location>,
    #[serde(rename = "themeSettingsMap")]
    pub theme_settings: ThemeSettings,
}

impl Settings {
    pub fn with_language(self, language: Language) -> Self {
        Self { language, ..self }
    }

    pub fn with_known_locations(self, known_locations: PersistentList<Location>) -> Self {
        Self {
            known_locations,
            ..self
        }
    }

    pub fn with_theme_settings(self, theme_settings: ThemeSettings) -> Self {
        Self {
            theme_settings,
            ..self
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_is_english_and_empty() {
        // Arrange / Act
        let settings = Settings::default();

        // Assert
        assert_eq!(settings.language, Language::English);
        assert!(settings.known_locations.is_empty());
        assert!(settings.theme_settings.is_empty());
    }

    #[test]
    fn test_with_language_keeps_other_fields() {
        // Arrange
        let original = Settings::default()
            .with_known_locations(vec![Location::new(1.0, 2.0)].into())
            .with_theme_settings(
                ThemeSettings::new().insert("dark".to_string(), ThemeSetting::new("d", "Dark", true)),
            );

        // Act
        let updated = original.clone().with_language(Language::Spanish);

        // Assert
        assert_eq!(updated.language, Language::Spanish);
        assert_eq!(updated.known_locations, original.known_locations);
        assert_eq!(updated.theme_settings, original.theme_settings);
        assert_eq!(original.language, Language::English);
    }

    #[test]
    fn test_language_parses_wire_literals_case_insensitively() {
        assert_eq!("GERMAN".parse::<Language>(), Ok(Language::German));
        assert_eq!("spanish".parse::<Language>(), Ok(Language::Spanish));
        assert_eq!(" English ".parse::<Language>(), Ok(Language::English));
    }

    #[test]
    fn test_language_rejects_unknown_literal() {
        let err = "FRENCH".parse::<Language>().unwrap_err();
        assert_eq!(err, ParseLanguageError("FRENCH".to_string()));
    }

    #[test]
    fn test_language_display_matches_wire_literal() {
        for language in Language::ALL {
            let json = serde_json::to_string(&language).unwrap();
            assert_eq!(json, format!("\"{language}\""));
        }
    }

    #[test]
    fn test_location_is_finite() {
        assert!(Location::new(0.5, -120.0).is_finite());
        assert!(!Location::new(f64::NAN, 0.0).is_finite());
        assert!(!Location::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new(0.5, 1.25).to_string(), "(0.5, 1.25)");
    }
}
