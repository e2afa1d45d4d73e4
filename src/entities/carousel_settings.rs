//! Carousel settings entity - The single configuration row of the homepage carousel.
//!
//! The primary key is fixed to [`SETTINGS_ROW_ID`] so the table can never hold
//! more than one row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only settings row
pub const SETTINGS_ROW_ID: i32 = 1;

/// Carousel settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carousel_settings")]
pub struct Model {
    /// Always [`SETTINGS_ROW_ID`]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Whether the carousel is shown on the homepage
    pub is_active: bool,
    /// Seconds between slides
    pub interval_seconds: i32,
    /// File handle of the background video in the `carousel` category
    pub video_filename: Option<String>,
    /// Whether the background video is shown
    pub show_video: bool,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// `CarouselSettings` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
