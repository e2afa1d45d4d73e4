//! Public read model - What visitors see on the home page.
//!
//! Everything here is recomputed on each call; there is no cached ordering.

use crate::{
    core::carousel::get_or_init_settings,
    entities::{
        Agency, AgencyImage, CarouselItem, Plan, agency, agency_image, carousel_item,
        carousel_settings, plan,
    },
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// An active agency with its plan and primary image.
#[derive(Debug, Clone, Serialize)]
pub struct AgencyListing {
    /// The agency record
    pub agency: agency::Model,
    /// Its plan, when one is attached
    pub plan: Option<plan::Model>,
    /// Its primary gallery image, when one is set
    pub primary_image: Option<agency_image::Model>,
}

/// The carousel as shown to visitors.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselView {
    /// Current settings
    pub settings: carousel_settings::Model,
    /// Active slides by position
    pub items: Vec<carousel_item::Model>,
}

/// Everything the home page renders.
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    /// Active agencies in display order
    pub agencies: Vec<AgencyListing>,
    /// Active plans by price
    pub plans: Vec<plan::Model>,
    /// The carousel, absent when disabled
    pub carousel: Option<CarouselView>,
}

/// Lists active agencies for visitors.
///
/// Agencies are ordered by plan name descending, agencies without a plan
/// last, then by `sort_order` and id.
pub async fn list_public_agencies(db: &DatabaseConnection) -> Result<Vec<AgencyListing>> {
    let rows = Agency::find()
        .find_also_related(Plan)
        .filter(agency::Column::IsActive.eq(true))
        .order_by_desc(plan::Column::Name)
        .order_by_asc(agency::Column::SortOrder)
        .order_by_asc(agency::Column::Id)
        .all(db)
        .await?;

    let agency_ids: Vec<i32> = rows.iter().map(|(agency, _)| agency.id).collect();
    let mut primaries: HashMap<i32, agency_image::Model> = AgencyImage::find()
        .filter(agency_image::Column::AgencyId.is_in(agency_ids))
        .filter(agency_image::Column::IsPrimary.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|image| (image.agency_id, image))
        .collect();

    // Stable sort: agencies without a plan go last whatever the backend's NULL ordering
    let mut listings: Vec<AgencyListing> = rows
        .into_iter()
        .map(|(agency, plan)| AgencyListing {
            primary_image: primaries.remove(&agency.id),
            agency,
            plan,
        })
        .collect();
    listings.sort_by_key(|listing| listing.plan.is_none());

    debug!("Listing {} public agencies", listings.len());
    Ok(listings)
}

/// Lists active plans by ascending price.
pub async fn list_public_plans(db: &DatabaseConnection) -> Result<Vec<plan::Model>> {
    Plan::find()
        .filter(plan::Column::IsActive.eq(true))
        .order_by_asc(plan::Column::Price)
        .order_by_asc(plan::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The carousel for visitors, or `None` when it is disabled.
pub async fn public_carousel(db: &DatabaseConnection) -> Result<Option<CarouselView>> {
    let settings = get_or_init_settings(db).await?;
    if !settings.is_active {
        return Ok(None);
    }

    let items = CarouselItem::find()
        .filter(carousel_item::Column::IsActive.eq(true))
        .order_by_asc(carousel_item::Column::SortOrder)
        .order_by_asc(carousel_item::Column::Id)
        .all(db)
        .await?;
    Ok(Some(CarouselView { settings, items }))
}

/// Builds the home page.
pub async fn home_page(db: &DatabaseConnection) -> Result<HomePage> {
    Ok(HomePage {
        agencies: list_public_agencies(db).await?,
        plans: list_public_plans(db).await?,
        carousel: public_carousel(db).await?,
    })
}
