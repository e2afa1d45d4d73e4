//! Contact message entity - Messages submitted through the public contact form.
//! Only `is_read` changes after creation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contact message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_messages")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Sender phone number
    pub phone: Option<String>,
    /// Message subject
    pub subject: String,
    /// Message body
    #[sea_orm(column_type = "Text")]
    pub message: String,
    /// When the message was received
    pub created_at: DateTime,
    /// Whether an admin has read the message
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
