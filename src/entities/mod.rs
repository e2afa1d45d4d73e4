//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod agency;
pub mod agency_image;
pub mod carousel_item;
pub mod carousel_settings;
pub mod contact_message;
pub mod plan;

// Re-export specific types to avoid conflicts
pub use agency::{Column as AgencyColumn, Entity as Agency, Model as AgencyModel};
pub use agency_image::{
    Column as AgencyImageColumn, Entity as AgencyImage, Model as AgencyImageModel,
};
pub use carousel_item::{
    Column as CarouselItemColumn, Entity as CarouselItem, Model as CarouselItemModel,
};
pub use carousel_settings::{
    Column as CarouselSettingsColumn, Entity as CarouselSettings, Model as CarouselSettingsModel,
};
pub use contact_message::{
    Column as ContactMessageColumn, Entity as ContactMessage, Model as ContactMessageModel,
};
pub use plan::{BillingPeriod, Column as PlanColumn, Entity as Plan, Model as PlanModel};
