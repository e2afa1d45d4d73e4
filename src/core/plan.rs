//! Plan business logic - Subscription plans referenced by agencies.
//!
//! Plan names are unique (exact, case-sensitive match) and prices must be
//! finite and non-negative. A plan still referenced by an agency cannot be
//! deleted.

use crate::{
    entities::{Agency, BillingPeriod, Plan, agency, plan},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::str::FromStr;
use tracing::{info, warn};

/// Editable fields of a plan, shared by create and update.
#[derive(Debug, Clone)]
pub struct PlanFields {
    /// Unique display name
    pub name: String,
    /// Price per billing period
    pub price: f64,
    /// Billing period
    pub billing_period: BillingPeriod,
    /// Feature list
    pub description: Option<String>,
    /// Whether the plan is offered publicly
    pub is_active: bool,
}

impl FromStr for BillingPeriod {
    type Err = Error;

    /// Parses a form value. An empty value means monthly.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(Error::validation(format!(
                "Unknown billing period '{other}'"
            ))),
        }
    }
}

impl PlanFields {
    fn validate(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Plan name cannot be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidPrice { amount: self.price });
        }
        Ok(name.to_string())
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn ensure_unique_name<C>(db: &C, name: &str, exclude_id: Option<i32>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Plan::find().filter(plan::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(plan::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::validation(format!(
            "A plan named '{name}' already exists"
        )));
    }
    Ok(())
}

/// Retrieves a plan by id.
pub async fn get_plan<C>(db: &C, plan_id: i32) -> Result<plan::Model>
where
    C: ConnectionTrait,
{
    Plan::find_by_id(plan_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "plan",
            id: plan_id,
        })
}

/// Lists every plan, ordered by name, for the admin plan table.
pub async fn list_plans(db: &DatabaseConnection) -> Result<Vec<plan::Model>> {
    Plan::find()
        .order_by_asc(plan::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists active plans ordered by name, as offered in the agency form.
pub async fn list_active_plans(db: &DatabaseConnection) -> Result<Vec<plan::Model>> {
    Plan::find()
        .filter(plan::Column::IsActive.eq(true))
        .order_by_asc(plan::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a plan.
///
/// # Errors
/// Returns a validation error for an empty or duplicate name and
/// [`Error::InvalidPrice`] for a negative or non-finite price.
pub async fn create_plan(db: &DatabaseConnection, fields: PlanFields) -> Result<plan::Model> {
    let txn = db.begin().await?;
    let plan = create_plan_in(&txn, fields).await?;
    txn.commit().await?;

    info!("Created plan '{}' (ID: {})", plan.name, plan.id);
    Ok(plan)
}

/// Inserts a plan inside a transaction owned by the caller.
pub(crate) async fn create_plan_in<C>(db: &C, fields: PlanFields) -> Result<plan::Model>
where
    C: ConnectionTrait,
{
    let name = fields.validate()?;
    ensure_unique_name(db, &name, None).await?;

    plan::ActiveModel {
        name: Set(name),
        price: Set(fields.price),
        billing_period: Set(fields.billing_period),
        description: Set(clean_optional(fields.description)),
        is_active: Set(fields.is_active),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Updates a plan. The uniqueness check ignores the plan's own name.
///
/// # Errors
/// Returns [`Error::NotFound`] for an unknown id and the same validation
/// errors as [`create_plan`].
pub async fn update_plan(
    db: &DatabaseConnection,
    plan_id: i32,
    fields: PlanFields,
) -> Result<plan::Model> {
    let name = fields.validate()?;

    let txn = db.begin().await?;
    let existing = get_plan(&txn, plan_id).await?;
    ensure_unique_name(&txn, &name, Some(plan_id)).await?;

    let mut plan: plan::ActiveModel = existing.into();
    plan.name = Set(name);
    plan.price = Set(fields.price);
    plan.billing_period = Set(fields.billing_period);
    plan.description = Set(clean_optional(fields.description));
    plan.is_active = Set(fields.is_active);
    let plan = plan.update(&txn).await?;
    txn.commit().await?;

    info!("Updated plan '{}' (ID: {})", plan.name, plan.id);
    Ok(plan)
}

/// Deletes a plan that no agency references.
///
/// # Errors
/// Returns [`Error::Conflict`] while agencies still use the plan.
pub async fn delete_plan(db: &DatabaseConnection, plan_id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let plan = get_plan(&txn, plan_id).await?;

    let in_use = Agency::find()
        .filter(agency::Column::PlanId.eq(plan_id))
        .count(&txn)
        .await?;
    if in_use > 0 {
        warn!(
            "Refusing to delete plan '{}' (ID: {}): used by {} agencies",
            plan.name, plan_id, in_use
        );
        return Err(Error::Conflict {
            message: format!("Plan '{}' is used by {in_use} agencies", plan.name),
        });
    }

    Plan::delete_by_id(plan_id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted plan '{}' (ID: {})", plan.name, plan_id);
    Ok(())
}
