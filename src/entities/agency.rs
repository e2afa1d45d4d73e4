//! Agency entity - Real-estate agencies listed in the directory.
//!
//! Agencies carry a manual `sort_order`, optional logo and cover file handles,
//! and own their gallery images.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Agency database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agencies")]
pub struct Model {
    /// Unique identifier for the agency
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Agency name
    pub name: String,
    /// City the agency operates in
    pub city: String,
    /// Website URL, always carrying a scheme
    pub website: String,
    /// File handle of the logo in the `logos` category
    pub logo_filename: Option<String>,
    /// File handle of the cover in the `covers` category
    pub cover_filename: Option<String>,
    /// Free-form presentation text
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Subscription plan, if any
    pub plan_id: Option<i32>,
    /// Inactive agencies are hidden from the public listing
    pub is_active: bool,
    /// Admin-controlled display position
    pub sort_order: i32,
    /// When the agency was created
    pub created_at: DateTime,
    /// When the agency was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Agency and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each agency optionally belongs to one plan
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id",
        on_delete = "Restrict"
    )]
    Plan,
    /// One agency owns many gallery images
    #[sea_orm(has_many = "super::agency_image::Entity")]
    Images,
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::agency_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
