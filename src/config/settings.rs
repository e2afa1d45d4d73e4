//! Runtime settings read from environment variables.
//!
//! `.env` is loaded by the binary before [`AppSettings::from_env`] runs, so values
//! may come from either the file or the real environment.

use std::path::PathBuf;

/// Language used when a caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Application settings resolved at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// `SeaORM` connection URL
    pub database_url: String,
    /// Root directory of uploaded files
    pub upload_folder: PathBuf,
    /// Directory holding `<lang>.json` translation files
    pub translations_dir: PathBuf,
    /// Fallback language for lookups
    pub default_language: String,
    /// TOML file with the first-run seed data
    pub seed_config: PathBuf,
}

impl AppSettings {
    /// Reads `DATABASE_URL`, `UPLOAD_FOLDER`, `TRANSLATIONS_DIR`, `DEFAULT_LANGUAGE`
    /// and `SEED_CONFIG`, falling back to defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: super::database::get_database_url(),
            upload_folder: env_or("UPLOAD_FOLDER", "uploads").into(),
            translations_dir: env_or("TRANSLATIONS_DIR", "translations").into(),
            default_language: env_or("DEFAULT_LANGUAGE", DEFAULT_LANGUAGE),
            seed_config: env_or("SEED_CONFIG", "config.toml").into(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
