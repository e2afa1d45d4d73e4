//! First-run initialization.
//!
//! Creates the upload directories and tables, then inserts the seed plans and
//! sample agencies when their tables are empty. Running it again on a
//! populated database changes nothing.

use crate::{
    config::{database::create_tables, seed::SeedConfig},
    core::{
        agency::normalize_website,
        plan::{PlanFields, create_plan_in},
    },
    entities::{Agency, Plan, agency, plan},
    errors::Result,
    storage::FileStore,
};
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{info, warn};

/// What an initialization run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupReport {
    /// Plans created from the seed
    pub plans_created: usize,
    /// Agencies created from the seed
    pub agencies_created: usize,
}

/// Prepares storage and database and seeds empty tables.
///
/// # Errors
/// Returns [`Error::Storage`](crate::errors::Error::Storage) when the upload
/// directories cannot be created, a validation error for an invalid seed plan,
/// and database errors from table creation or inserts. Plans and agencies are
/// each seeded in one transaction, so a failure leaves that table empty.
pub async fn initialize_application(
    db: &DatabaseConnection,
    store: &FileStore,
    seed: &SeedConfig,
) -> Result<SetupReport> {
    info!("Starting application setup...");
    store.ensure_directories().await?;
    create_tables(db).await?;

    let report = SetupReport {
        plans_created: seed_plans(db, seed).await?,
        agencies_created: seed_agencies(db, seed).await?,
    };

    info!(
        "Application setup complete: {} plans and {} agencies created",
        report.plans_created, report.agencies_created
    );
    Ok(report)
}

async fn seed_plans(db: &DatabaseConnection, seed: &SeedConfig) -> Result<usize> {
    let existing = Plan::find().count(db).await?;
    if existing > 0 {
        info!("Plans already exist ({} found), skipping plan seed", existing);
        return Ok(0);
    }

    let txn = db.begin().await?;
    for plan in &seed.plans {
        create_plan_in(
            &txn,
            PlanFields {
                name: plan.name.clone(),
                price: plan.price,
                billing_period: plan.billing_period,
                description: plan.description.clone(),
                is_active: true,
            },
        )
        .await?;
    }
    txn.commit().await?;
    Ok(seed.plans.len())
}

async fn seed_agencies(db: &DatabaseConnection, seed: &SeedConfig) -> Result<usize> {
    let existing = Agency::find().count(db).await?;
    if existing > 0 {
        info!("Agencies already exist ({} found), skipping agency seed", existing);
        return Ok(0);
    }

    let txn = db.begin().await?;
    let plan_ids: HashMap<String, i32> = Plan::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|plan: plan::Model| (plan.name, plan.id))
        .collect();

    for sample in &seed.agencies {
        let plan_id = match &sample.plan {
            Some(name) => {
                let id = plan_ids.get(name).copied();
                if id.is_none() {
                    warn!(
                        "Seed agency '{}' references unknown plan '{}'",
                        sample.name, name
                    );
                }
                id
            }
            None => None,
        };

        let now = chrono::Utc::now().naive_utc();
        agency::ActiveModel {
            name: Set(sample.name.clone()),
            city: Set(sample.city.clone()),
            website: Set(normalize_website(&sample.website)),
            logo_filename: Set(None),
            cover_filename: Set(None),
            description: Set(sample.description.clone()),
            plan_id: Set(plan_id),
            is_active: Set(true),
            sort_order: Set(sample.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;
    Ok(seed.agencies.len())
}
