//! Settings store command-line front-end.
//!
//! A headless stand-in for the settings screen: it shows the persisted
//! settings and applies the same changes the screen offers.
//!
//! # Usage
//!
//! ```text
//! settings-store [--data-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   show             Print the current settings
//!   set-language     Change only the language
//!   select-language  Change the language like the settings screen does
//!   add-location     Append a known location
//!   clear-locations  Remove all known locations
//!   set-theme        Add or replace a theme setting
//!   remove-theme     Remove a theme setting
//! ```
//!
//! | Variable            | Description                                    |
//! |---------------------|------------------------------------------------|
//! | `SETTINGS_DATA_DIR` | Directory holding `app-settings.json`          |
//! | `RUST_LOG`          | Log filter, e.g. `debug` (default `info`)      |

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use settings_core::{Language, Location, Settings, ThemeSetting};
use settings_store::application::actions;
use settings_store::infrastructure::storage::{paths, FileBlobStore};
use settings_store::SettingsStore;

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "settings-store",
    about = "Inspect and change the persisted application settings",
    version
)]
struct Cli {
    /// Directory holding the settings file.
    ///
    /// Defaults to the platform data directory.
    #[arg(long, global = true, env = "SETTINGS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current settings.
    Show,

    /// Change only the language.
    SetLanguage {
        /// ENGLISH, GERMAN, or SPANISH (case-insensitive).
        language: Language,
    },

    /// Change the language like the settings screen does: the known
    /// locations are replaced by one random location and the guide theme
    /// entry is written.
    SelectLanguage {
        /// ENGLISH, GERMAN, or SPANISH (case-insensitive).
        language: Language,
    },

    /// Append a known location.
    AddLocation {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },

    /// Remove all known locations.
    ClearLocations,

    /// Add or replace a theme setting.
    SetTheme {
        /// Map key of the theme setting.
        key: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        enabled: bool,
    },

    /// Remove a theme setting.
    RemoveTheme {
        /// Map key of the theme setting.
        key: String,
    },
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn render(settings: &Settings) -> String {
    let mut out = format!("Language: {}\n", settings.language);

    out.push_str("Known locations:\n  ");
    if settings.known_locations.is_empty() {
        out.push_str("(none)");
    } else {
        let locations: Vec<String> = settings.known_locations.iter().map(Location::to_string).collect();
        out.push_str(&locations.join(", "));
    }

    out.push_str("\nTheme settings:\n");
    if settings.theme_settings.is_empty() {
        out.push_str("  (none)\n");
    } else {
        let mut entries: Vec<_> = settings.theme_settings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, theme) in entries {
            out.push_str(&format!(
                "  {key}: id={} title={} enabled={}\n",
                theme.id, theme.title, theme.is_enabled
            ));
        }
    }
    out
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let path = paths::settings_file_path(cli.data_dir.as_deref())
        .context("failed to resolve the settings file location")?;
    info!("using settings file {}", path.display());
    let store = SettingsStore::for_settings(FileBlobStore::new(path));

    run(&store, cli.command).await
}

async fn run(store: &SettingsStore, command: Command) -> anyhow::Result<()> {
    let updated = match command {
        Command::Show => {
            let settings = store.read().await.context("failed to read settings")?;
            print!("{}", render(&settings));
            return Ok(());
        }
        Command::SetLanguage { language } => store.update(|s| s.with_language(language)).await,
        Command::SelectLanguage { language } => {
            let location = actions::random_location();
            store
                .update(|s| actions::select_language(s, language, location))
                .await
        }
        Command::AddLocation { lat, lng } => {
            store
                .update(|s| actions::add_location(s, Location::new(lat, lng)))
                .await
        }
        Command::ClearLocations => store.update(actions::clear_locations).await,
        Command::SetTheme {
            key,
            id,
            title,
            enabled,
        } => {
            store
                .update(|s| actions::put_theme_setting(s, key, ThemeSetting::new(id, title, enabled)))
                .await
        }
        Command::RemoveTheme { key } => {
            store
                .update(|s| actions::remove_theme_setting(s, &key))
                .await
        }
    };

    let settings = updated.context("failed to update settings")?;
    print!("{}", render(&settings));
    Ok(())
}
