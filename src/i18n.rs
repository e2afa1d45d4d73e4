//! Translations for user-facing messages.
//!
//! Every `<lang>.json` file of the translations directory is loaded once at
//! startup into memory. Lookups take the language explicitly; there is no
//! process-wide current language.

use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// In-memory translation tables keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    languages: HashMap<String, HashMap<String, String>>,
    default_language: String,
}

impl Translator {
    /// Loads every `*.json` file in `dir`.
    ///
    /// A file that is not a flat JSON object of strings is skipped with a
    /// warning.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when the directory cannot be read.
    pub fn load<P: AsRef<Path>>(dir: P, default_language: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| Error::Config {
            message: format!("Failed to read translations directory {}: {e}", dir.display()),
        })?;

        let mut languages = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let parsed = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|contents| {
                    serde_json::from_str::<HashMap<String, String>>(&contents)
                        .map_err(|e| e.to_string())
                });
            match parsed {
                Ok(table) => {
                    debug!("Loaded {} translations for '{}'", table.len(), code);
                    languages.insert(code.to_string(), table);
                }
                Err(e) => warn!("Skipping translation file {}: {}", path.display(), e),
            }
        }

        if !languages.contains_key(default_language) {
            warn!(
                "Default language '{}' has no translation file in {}",
                default_language,
                dir.display()
            );
        }
        info!(
            "Loaded translations for {} languages from {}",
            languages.len(),
            dir.display()
        );
        Ok(Self {
            languages,
            default_language: default_language.to_string(),
        })
    }

    /// The language used when a lookup misses.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Loaded language codes, sorted.
    #[must_use]
    pub fn available_languages(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// The requested language when it is loaded, otherwise the default.
    #[must_use]
    pub fn resolve_language<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(code) if self.languages.contains_key(code) => code,
            _ => &self.default_language,
        }
    }

    /// Translates `key`, falling back to the default language and then to the key itself.
    #[must_use]
    pub fn lookup<'a>(&'a self, key: &'a str, language: &str) -> &'a str {
        [language, self.default_language.as_str()]
            .into_iter()
            .find_map(|code| self.languages.get(code)?.get(key))
            .map_or(key, String::as_str)
    }

    /// The message to show after a mutating operation: `success_key` when it
    /// succeeded, the error's key otherwise.
    #[must_use]
    pub fn outcome<'a, T>(
        &'a self,
        result: &Result<T>,
        success_key: &'a str,
        language: &str,
    ) -> &'a str {
        match result {
            Ok(_) => self.lookup(success_key, language),
            Err(e) => self.lookup(e.message_key(), language),
        }
    }
}
