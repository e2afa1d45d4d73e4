//! Agency image entity - Gallery images owned by an agency.
//!
//! At most one image per agency has `is_primary` set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Agency image database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agency_images")]
pub struct Model {
    /// Unique identifier for the image
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning agency
    pub agency_id: i32,
    /// File handle in the `agencies` category
    pub image_filename: String,
    /// Alternative text for the image
    pub alt_text: Option<String>,
    /// Whether this is the agency's representative image
    pub is_primary: bool,
    /// Display position within the agency's gallery
    pub sort_order: i32,
    /// When the image was uploaded
    pub created_at: DateTime,
}

/// Defines relationships between `AgencyImage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each image belongs to one agency
    #[sea_orm(
        belongs_to = "super::agency::Entity",
        from = "Column::AgencyId",
        to = "super::agency::Column::Id",
        on_delete = "Cascade"
    )]
    Agency,
}

impl Related<super::agency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agency.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
