/// Database configuration and connection management
pub mod database;

/// First-run seed data loading from config.toml
pub mod seed;

/// Runtime settings from environment variables
pub mod settings;

pub use settings::AppSettings;
