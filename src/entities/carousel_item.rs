//! Carousel item entity - Homepage slides, an image with an optional link.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Carousel item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carousel_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i32,
    /// File handle in the `carousel` category
    pub image_filename: String,
    /// Where the slide links to
    pub link_url: Option<String>,
    /// Alternative text for the image
    pub alt_text: Option<String>,
    /// Inactive items are skipped by the public carousel
    pub is_active: bool,
    /// Display position
    pub sort_order: i32,
    /// When the item was created
    pub created_at: DateTime,
    /// When the item was last modified
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
