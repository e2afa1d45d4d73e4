//! Shared test utilities for the agency directory.
//!
//! This module provides common helper functions for setting up test databases,
//! throwaway file stores and records with sensible defaults.

use crate::{
    core::{
        agency::{self, AgencyFields},
        plan::PlanFields,
    },
    entities::{self, BillingPeriod},
    errors::Result,
    storage::{Category, FileStore, Upload},
};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Creates a file store in a fresh temporary directory.
/// Keep the returned [`TempDir`] alive for as long as the store is used.
#[allow(clippy::expect_used)]
pub fn test_store() -> (TempDir, FileStore) {
    let dir = tempfile::tempdir().expect("failed to create temporary upload folder");
    let store = FileStore::new(dir.path().join("uploads"));
    (dir, store)
}

/// Plan fields with sensible defaults.
///
/// # Defaults
/// * `billing_period`: monthly
/// * `description`: None
/// * `is_active`: true
pub fn plan_fields(name: &str, price: f64) -> PlanFields {
    PlanFields {
        name: name.to_string(),
        price,
        billing_period: BillingPeriod::Monthly,
        description: None,
        is_active: true,
    }
}

/// Agency fields with sensible defaults.
///
/// # Defaults
/// * `city`: "Marseille"
/// * `website`: `https://example.com`
/// * `plan_id`: None
/// * `is_active`: true
pub fn agency_fields(name: &str) -> AgencyFields {
    AgencyFields {
        name: name.to_string(),
        city: "Marseille".to_string(),
        website: "https://example.com".to_string(),
        description: None,
        plan_id: None,
        is_active: true,
    }
}

/// An upload with the given name and a few bytes of content.
pub fn png(filename: &str) -> Upload {
    Upload::new(filename, b"\x89PNG".to_vec())
}

/// Number of files currently stored in a category.
pub fn stored_files(store: &FileStore, category: Category) -> usize {
    std::fs::read_dir(store.root().join(category.as_str()))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

/// Creates an active agency without files.
pub async fn create_test_agency(
    db: &DatabaseConnection,
    store: &FileStore,
    name: &str,
    plan_id: Option<i32>,
) -> Result<entities::agency::Model> {
    let mut fields = agency_fields(name);
    fields.plan_id = plan_id;
    agency::create_agency(db, store, fields, None, None).await
}
