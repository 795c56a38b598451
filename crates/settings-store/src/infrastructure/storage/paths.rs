//! Location of the settings file.
//!
//! The file always has the fixed name [`SETTINGS_FILE_NAME`].  Its directory
//! is the platform data directory unless the caller overrides it:
//! - Windows:  `%APPDATA%\ProtoSettings\data\app-settings.json`
//! - Linux:    `$XDG_DATA_HOME/protosettings/app-settings.json`
//!   (or `~/.local/share/protosettings/app-settings.json`)
//! - macOS:    `~/Library/Application Support/ProtoSettings/app-settings.json`

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

/// Application name the platform data directory is derived from.
const APPLICATION_NAME: &str = "ProtoSettings";

/// File name of the single settings resource.
pub const SETTINGS_FILE_NAME: &str = "app-settings.json";

/// Error type for path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// No home directory is known, so there is no platform data directory.
    #[error("could not determine platform data directory; pass --data-dir")]
    NoPlatformDataDir,
}

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`PathError::NoPlatformDataDir`] when the user's home directory
/// cannot be determined.
pub fn data_dir() -> Result<PathBuf, PathError> {
    platform_data_dir().ok_or(PathError::NoPlatformDataDir)
}

/// Resolves the full path to the settings file, inside `override_dir` when
/// given and inside [`data_dir`] otherwise.
///
/// # Errors
///
/// Returns [`PathError::NoPlatformDataDir`] if no override is given and the
/// platform directory cannot be determined.
pub fn settings_file_path(override_dir: Option<&Path>) -> Result<PathBuf, PathError> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => data_dir()?,
    };
    Ok(dir.join(SETTINGS_FILE_NAME))
}

fn platform_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APPLICATION_NAME).map(|dirs| dirs.data_dir().to_path_buf())
}
