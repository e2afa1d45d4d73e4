//! Agency business logic - Handles the lifecycle of directory agencies.
//!
//! Agencies are created with the next free `sort_order`, reordered explicitly by
//! admins, and own their logo, cover and gallery files. Every mutation runs in a
//! single database transaction. Uploaded files are written before the commit, so
//! a failed commit can leave an unreferenced file behind; that leak is accepted.
//! Files replaced by an update are removed best-effort after the commit, so the
//! stored handles always point at existing files.

use crate::{
    core::{gallery, ordering::apply_manual_order},
    entities::{Agency, Plan, agency},
    errors::{Error, Result},
    storage::{Category, FileStore, MediaKind, Upload},
};
use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseTransaction, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Editable fields of an agency as submitted by the admin form.
#[derive(Debug, Clone)]
pub struct AgencyFields {
    /// Agency name
    pub name: String,
    /// City
    pub city: String,
    /// Website, with or without scheme
    pub website: String,
    /// Presentation text
    pub description: Option<String>,
    /// Plan to attach, if any
    pub plan_id: Option<i32>,
    /// Whether the agency is listed publicly
    pub is_active: bool,
}

/// Files submitted with an agency update.
#[derive(Debug, Clone, Default)]
pub struct AgencyUploads {
    /// Replacement logo
    pub logo: Option<Upload>,
    /// Replacement cover
    pub cover: Option<Upload>,
    /// Images appended to the gallery
    pub gallery: Vec<Upload>,
    /// Alt text for the gallery images; derived from the agency name when absent
    pub gallery_alt_text: Option<String>,
}

/// Validated and normalized agency fields.
struct CleanFields {
    name: String,
    city: String,
    website: String,
    description: Option<String>,
}

/// Prefixes `https://` unless the website already starts with an http(s) scheme.
#[must_use]
pub fn normalize_website(raw: &str) -> String {
    let website = raw.trim();
    if website.starts_with("http://") || website.starts_with("https://") {
        website.to_string()
    } else {
        format!("https://{website}")
    }
}

impl AgencyFields {
    fn validate(&self) -> Result<CleanFields> {
        let name = self.name.trim();
        let city = self.city.trim();
        let website = self.website.trim();
        if name.is_empty() || city.is_empty() || website.is_empty() {
            return Err(Error::validation(
                "Agency name, city and website are required",
            ));
        }
        Ok(CleanFields {
            name: name.to_string(),
            city: city.to_string(),
            website: normalize_website(website),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }
}

async fn ensure_plan_exists(txn: &DatabaseTransaction, plan_id: Option<i32>) -> Result<()> {
    if let Some(plan_id) = plan_id {
        if Plan::find_by_id(plan_id).one(txn).await?.is_none() {
            return Err(Error::validation(format!("Plan {plan_id} does not exist")));
        }
    }
    Ok(())
}

/// Saves an optional image upload; rejected types yield `None`.
async fn save_image(
    store: &FileStore,
    upload: Option<&Upload>,
    category: Category,
) -> Result<Option<String>> {
    match upload {
        Some(upload) => store.save(upload, MediaKind::Image, category).await,
        None => Ok(None),
    }
}

async fn next_sort_order(txn: &DatabaseTransaction) -> Result<i32> {
    let max: Option<Option<i32>> = Agency::find()
        .select_only()
        .column_as(Expr::col(agency::Column::SortOrder).max(), "max_sort_order")
        .into_tuple()
        .one(txn)
        .await?;
    Ok(max.flatten().map_or(0, |max| max + 1))
}

/// Retrieves an agency by id.
pub async fn get_agency<C>(db: &C, agency_id: i32) -> Result<agency::Model>
where
    C: ConnectionTrait,
{
    Agency::find_by_id(agency_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "agency",
            id: agency_id,
        })
}

/// Lists every agency in admin display order (`sort_order`, then id).
pub async fn list_agencies(db: &DatabaseConnection) -> Result<Vec<agency::Model>> {
    Agency::find()
        .order_by_asc(agency::Column::SortOrder)
        .order_by_asc(agency::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates an agency at the end of the current order.
///
/// Logo and cover are stored only when they are allowed image types; anything
/// else is ignored without error.
///
/// # Errors
/// Returns a validation error for missing required fields or an unknown plan,
/// and [`Error::Storage`] when an accepted file cannot be written.
pub async fn create_agency(
    db: &DatabaseConnection,
    store: &FileStore,
    fields: AgencyFields,
    logo: Option<Upload>,
    cover: Option<Upload>,
) -> Result<agency::Model> {
    let clean = fields.validate()?;

    let txn = db.begin().await?;
    ensure_plan_exists(&txn, fields.plan_id).await?;

    let logo_filename = save_image(store, logo.as_ref(), Category::Logos).await?;
    let cover_filename = save_image(store, cover.as_ref(), Category::Covers).await?;

    let sort_order = next_sort_order(&txn).await?;
    let now = chrono::Utc::now().naive_utc();
    let agency = agency::ActiveModel {
        name: Set(clean.name),
        city: Set(clean.city),
        website: Set(clean.website),
        logo_filename: Set(logo_filename),
        cover_filename: Set(cover_filename),
        description: Set(clean.description),
        plan_id: Set(fields.plan_id),
        is_active: Set(fields.is_active),
        sort_order: Set(sort_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Created agency '{}' (ID: {}) at position {}",
        agency.name, agency.id, agency.sort_order
    );
    Ok(agency)
}

/// Saves a replacement logo or cover. Returns the handle to store and, when a
/// new file was saved, the previous handle to delete once the update commits.
async fn replace_file(
    store: &FileStore,
    upload: Option<&Upload>,
    category: Category,
    current: Option<String>,
) -> Result<(Option<String>, Option<String>)> {
    match save_image(store, upload, category).await? {
        Some(new_handle) => Ok((Some(new_handle), current)),
        None => Ok((current, None)),
    }
}

/// Updates an agency and appends any submitted gallery images.
///
/// # Errors
/// Returns [`Error::NotFound`] for an unknown id, a validation error for
/// missing fields or an unknown plan, and [`Error::Storage`] when a file
/// cannot be written.
pub async fn update_agency(
    db: &DatabaseConnection,
    store: &FileStore,
    agency_id: i32,
    fields: AgencyFields,
    uploads: AgencyUploads,
) -> Result<agency::Model> {
    let clean = fields.validate()?;

    let txn = db.begin().await?;
    let existing = get_agency(&txn, agency_id).await?;
    ensure_plan_exists(&txn, fields.plan_id).await?;

    let (logo_filename, stale_logo) = replace_file(
        store,
        uploads.logo.as_ref(),
        Category::Logos,
        existing.logo_filename.clone(),
    )
    .await?;
    let (cover_filename, stale_cover) = replace_file(
        store,
        uploads.cover.as_ref(),
        Category::Covers,
        existing.cover_filename.clone(),
    )
    .await?;

    let mut agency: agency::ActiveModel = existing.into();
    agency.name = Set(clean.name);
    agency.city = Set(clean.city);
    agency.website = Set(clean.website);
    agency.description = Set(clean.description);
    agency.plan_id = Set(fields.plan_id);
    agency.is_active = Set(fields.is_active);
    agency.logo_filename = Set(logo_filename);
    agency.cover_filename = Set(cover_filename);
    agency.updated_at = Set(chrono::Utc::now().naive_utc());
    let agency = agency.update(&txn).await?;

    if !uploads.gallery.is_empty() {
        let added = gallery::add_images_in(
            &txn,
            store,
            &agency,
            &uploads.gallery,
            uploads.gallery_alt_text.as_deref(),
        )
        .await?;
        debug!("Appended {} gallery images to agency {}", added.len(), agency.id);
    }

    txn.commit().await?;

    // Replaced files go only once the new handles are committed
    if let Some(old) = stale_logo {
        store.delete(Category::Logos, &old).await;
    }
    if let Some(old) = stale_cover {
        store.delete(Category::Covers, &old).await;
    }

    info!("Updated agency '{}' (ID: {})", agency.name, agency.id);
    Ok(agency)
}

/// Deletes an agency together with its files and gallery.
///
/// Logo and cover files are removed first (best-effort), then the gallery rows
/// and files, then the agency record.
///
/// # Errors
/// Returns [`Error::NotFound`] for an unknown id.
pub async fn delete_agency(
    db: &DatabaseConnection,
    store: &FileStore,
    agency_id: i32,
) -> Result<()> {
    let txn = db.begin().await?;
    let agency = get_agency(&txn, agency_id).await?;

    if let Some(logo) = &agency.logo_filename {
        store.delete(Category::Logos, logo).await;
    }
    if let Some(cover) = &agency.cover_filename {
        store.delete(Category::Covers, cover).await;
    }
    let removed_images = gallery::delete_all_for_agency(&txn, store, agency_id).await?;

    Agency::delete_by_id(agency_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted agency '{}' (ID: {}) and {} gallery images",
        agency.name, agency_id, removed_images
    );
    Ok(())
}

/// Assigns `sort_order = index` to each listed agency.
///
/// Unlisted agencies keep their position; unknown ids are ignored.
pub async fn reorder_agencies(db: &DatabaseConnection, ordered_ids: &[i32]) -> Result<()> {
    let txn = db.begin().await?;
    let updated = apply_manual_order::<_, Agency>(
        &txn,
        ordered_ids,
        agency::Column::Id,
        agency::Column::SortOrder,
        None,
    )
    .await?;
    txn.commit().await?;

    info!(
        "Reordered agencies: {} ids submitted, {} updated",
        ordered_ids.len(),
        updated
    );
    Ok(())
}
