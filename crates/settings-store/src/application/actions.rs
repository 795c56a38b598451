//! Settings transforms used by the front-end.
//!
//! Every function here takes a [`Settings`] by value and returns the changed
//! copy, so each one can be passed straight to
//! [`DataStore::update`](super::data_store::DataStore::update).

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use settings_core::{Language, Location, PersistentList, Settings, ThemeSetting};

/// Key of the theme entry written by [`select_language`].
pub const GUIDE_THEME_KEY: &str = "ProtoDSGuide";

/// The theme entry written by [`select_language`].
pub fn guide_theme_setting() -> ThemeSetting {
    ThemeSetting::new("DoesItWork?", "MapSerialization", true)
}

/// Selects `language` the way the language picker does: the known locations
/// are replaced by `location` alone, and the [`GUIDE_THEME_KEY`] theme entry
/// is (re)written.
pub fn select_language(settings: Settings, language: Language, location: Location) -> Settings {
    let theme_settings = settings
        .theme_settings
        .insert(GUIDE_THEME_KEY.to_string(), guide_theme_setting());
    Settings {
        language,
        known_locations: PersistentList::from(vec![location]),
        theme_settings,
    }
}

/// Appends `location` to the known locations.
pub fn add_location(settings: Settings, location: Location) -> Settings {
    let known_locations = settings.known_locations.push(location);
    settings.with_known_locations(known_locations)
}

pub fn clear_locations(settings: Settings) -> Settings {
    settings.with_known_locations(PersistentList::new())
}

/// Binds `key` to `setting`, replacing any previous entry.
pub fn put_theme_setting(settings: Settings, key: impl Into<String>, setting: ThemeSetting) -> Settings {
    let theme_settings = settings.theme_settings.insert(key.into(), setting);
    settings.with_theme_settings(theme_settings)
}

pub fn remove_theme_setting(settings: Settings, key: &str) -> Settings {
    let theme_settings = settings.theme_settings.remove(key);
    settings.with_theme_settings(theme_settings)
}

/// A location with both coordinates drawn from `[0, 1)`.
pub fn random_location() -> Location {
    Location::new(random_unit(), random_unit())
}

/// Returns a pseudo-random `f64` in `[0, 1)`.
///
/// Not suitable for anything security related.
fn random_unit() -> f64 {
    static CALLS: AtomicU64 = AtomicU64::new(0);

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(CALLS.fetch_add(1, Ordering::Relaxed));
    if let Ok(elapsed) = SystemTime::now().duration_since(UNIX_EPOCH) {
        hasher.write_u128(elapsed.as_nanos());
    }
    // Top 53 bits fill the f64 mantissa exactly.
    (hasher.finish() >> 11) as f64 / (1u64 << 53) as f64
}
