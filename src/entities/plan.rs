//! Plan entity - Subscription plans offered to agencies.
//!
//! Agencies reference a plan through a nullable foreign key. A plan cannot be
//! deleted while any agency still points at it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Billing period of a plan, stored as text
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    /// Billed every month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Billed once a year
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Plan database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    /// Unique identifier for the plan
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name, unique across plans (e.g. "Basic", "Premium")
    #[sea_orm(unique)]
    pub name: String,
    /// Price per billing period
    pub price: f64,
    /// How often the price is charged
    pub billing_period: BillingPeriod,
    /// Free-form feature list shown on the pricing section
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Inactive plans are hidden from the public pricing section and agency forms
    pub is_active: bool,
    /// When the plan was created
    pub created_at: DateTime,
}

/// Defines relationships between Plan and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One plan is referenced by many agencies
    #[sea_orm(has_many = "super::agency::Entity")]
    Agencies,
}

impl Related<super::agency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agencies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
