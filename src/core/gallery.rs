//! Agency image gallery - Multiple images per agency with one primary image.
//!
//! The first image added to an agency without images becomes its primary
//! image. Deleting the primary image leaves the agency without one; no other
//! image is promoted.

use crate::{
    core::{agency::get_agency, ordering::apply_manual_order},
    entities::{AgencyImage, agency, agency_image},
    errors::{Error, Result},
    storage::{Category, FileStore, MediaKind, Upload},
};
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, warn};

/// Alt text used when none is supplied.
fn default_alt_text(agency_name: &str) -> String {
    format!("Image de {agency_name}")
}

/// Lists an agency's images in gallery order.
pub async fn list_images<C>(db: &C, agency_id: i32) -> Result<Vec<agency_image::Model>>
where
    C: ConnectionTrait,
{
    AgencyImage::find()
        .filter(agency_image::Column::AgencyId.eq(agency_id))
        .order_by_asc(agency_image::Column::SortOrder)
        .order_by_asc(agency_image::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The agency's primary image, if it has one.
pub async fn primary_image<C>(db: &C, agency_id: i32) -> Result<Option<agency_image::Model>>
where
    C: ConnectionTrait,
{
    AgencyImage::find()
        .filter(agency_image::Column::AgencyId.eq(agency_id))
        .filter(agency_image::Column::IsPrimary.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn get_image<C>(db: &C, image_id: i32) -> Result<agency_image::Model>
where
    C: ConnectionTrait,
{
    AgencyImage::find_by_id(image_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "agency image",
            id: image_id,
        })
}

/// Appends images to an agency's gallery inside an open transaction.
///
/// Uploads that are not allowed image types are skipped. Each new image is
/// placed after the current images; when the agency had none, the first new
/// image becomes primary.
pub(crate) async fn add_images_in<C>(
    db: &C,
    store: &FileStore,
    agency: &agency::Model,
    uploads: &[Upload],
    alt_text: Option<&str>,
) -> Result<Vec<agency_image::Model>>
where
    C: ConnectionTrait,
{
    let alt_text = alt_text
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map_or_else(|| default_alt_text(&agency.name), str::to_string);

    let existing = AgencyImage::find()
        .filter(agency_image::Column::AgencyId.eq(agency.id))
        .count(db)
        .await?;
    let mut next_order = i32::try_from(existing)
        .map_err(|_| Error::validation("Too many images for one agency"))?;
    let mut needs_primary = existing == 0;

    let mut added = Vec::new();
    for upload in uploads {
        let Some(handle) = store
            .save(upload, MediaKind::Image, Category::Agencies)
            .await?
        else {
            debug!("Skipping gallery upload '{}'", upload.filename);
            continue;
        };

        let image = agency_image::ActiveModel {
            agency_id: Set(agency.id),
            image_filename: Set(handle),
            alt_text: Set(Some(alt_text.clone())),
            is_primary: Set(needs_primary),
            sort_order: Set(next_order),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        needs_primary = false;
        next_order += 1;
        added.push(image);
    }
    Ok(added)
}

/// Adds images to an agency's gallery and returns the created records.
///
/// # Errors
/// Returns [`Error::NotFound`] for an unknown agency and [`Error::Storage`]
/// when an accepted file cannot be written.
pub async fn add_images(
    db: &DatabaseConnection,
    store: &FileStore,
    agency_id: i32,
    uploads: &[Upload],
    alt_text: Option<&str>,
) -> Result<Vec<agency_image::Model>> {
    let txn = db.begin().await?;
    let agency = get_agency(&txn, agency_id).await?;
    let added = add_images_in(&txn, store, &agency, uploads, alt_text).await?;
    txn.commit().await?;

    if added.is_empty() {
        warn!(
            "No valid images among {} uploads for agency {}",
            uploads.len(),
            agency_id
        );
    } else {
        info!("Added {} images to agency {}", added.len(), agency_id);
    }
    Ok(added)
}

/// Deletes one image: its file first (best-effort), then the record.
/// The agency may be left without a primary image.
///
/// # Errors
/// Returns [`Error::NotFound`] for an unknown image.
pub async fn delete_image(db: &DatabaseConnection, store: &FileStore, image_id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let image = get_image(&txn, image_id).await?;

    store.delete(Category::Agencies, &image.image_filename).await;
    AgencyImage::delete_by_id(image_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted image {} of agency {}{}",
        image_id,
        image.agency_id,
        if image.is_primary { " (was primary)" } else { "" }
    );
    Ok(())
}

/// Removes every image of an agency, files first. Returns the number of rows deleted.
pub(crate) async fn delete_all_for_agency<C>(
    db: &C,
    store: &FileStore,
    agency_id: i32,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    for image in list_images(db, agency_id).await? {
        store.delete(Category::Agencies, &image.image_filename).await;
    }
    let result = AgencyImage::delete_many()
        .filter(agency_image::Column::AgencyId.eq(agency_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Makes `image_id` the only primary image of its agency.
///
/// A single UPDATE sets `is_primary = (id = image_id)` across the agency's
/// images, so no reader can observe zero or two primaries.
///
/// # Errors
/// Returns [`Error::NotFound`] for an unknown image.
pub async fn set_primary(db: &DatabaseConnection, image_id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let image = get_image(&txn, image_id).await?;

    AgencyImage::update_many()
        .col_expr(
            agency_image::Column::IsPrimary,
            Expr::col(agency_image::Column::Id).eq(image_id),
        )
        .filter(agency_image::Column::AgencyId.eq(image.agency_id))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    info!(
        "Image {} is now primary for agency {}",
        image_id, image.agency_id
    );
    Ok(())
}

/// Reorders the images of one agency. Ids owned by other agencies are ignored.
pub async fn reorder_images(
    db: &DatabaseConnection,
    agency_id: i32,
    ordered_ids: &[i32],
) -> Result<()> {
    let txn = db.begin().await?;
    let updated = apply_manual_order::<_, AgencyImage>(
        &txn,
        ordered_ids,
        agency_image::Column::Id,
        agency_image::Column::SortOrder,
        Some(Condition::all().add(agency_image::Column::AgencyId.eq(agency_id))),
    )
    .await?;
    txn.commit().await?;

    info!(
        "Reordered images of agency {}: {} ids submitted, {} updated",
        agency_id,
        ordered_ids.len(),
        updated
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn primaries(images: &[agency_image::Model]) -> Vec<i32> {
        images.iter().filter(|i| i.is_primary).map(|i| i.id).collect()
    }

    #[tokio::test]
    async fn test_first_image_becomes_primary() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let agency = create_test_agency(&db, &store, "Agence", None).await?;

        let first_batch = add_images(
            &db,
            &store,
            agency.id,
            &[Upload::new("notes.txt", vec![1]), png("a.png"), png("b.png")],
            Some("Façade"),
        )
        .await?;
        assert_eq!(first_batch.len(), 2);
        assert!(first_batch[0].is_primary);
        assert!(!first_batch[1].is_primary);
        assert_eq!(first_batch[0].sort_order, 0);
        assert_eq!(first_batch[1].sort_order, 1);
        assert_eq!(first_batch[1].alt_text.as_deref(), Some("Façade"));

        let second_batch = add_images(&db, &store, agency.id, &[png("c.png")], None).await?;
        assert!(!second_batch[0].is_primary);
        assert_eq!(second_batch[0].sort_order, 2);
        assert_eq!(second_batch[0].alt_text.as_deref(), Some("Image de Agence"));

        let primary = primary_image(&db, agency.id).await?.unwrap();
        assert_eq!(primary.id, first_batch[0].id);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_images_to_missing_agency() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let result = add_images(&db, &store, 12, &[png("a.png")], None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "agency", id: 12 }
        ));
        assert_eq!(stored_files(&store, Category::Agencies), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_primary_leaves_exactly_one() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let agency = create_test_agency(&db, &store, "Agence", None).await?;
        let other = create_test_agency(&db, &store, "Autre", None).await?;

        let images = add_images(
            &db,
            &store,
            agency.id,
            &[png("a.png"), png("b.png"), png("c.png")],
            None,
        )
        .await?;
        let other_images = add_images(&db, &store, other.id, &[png("d.png")], None).await?;

        for target in &images {
            set_primary(&db, target.id).await?;
            let current = list_images(&db, agency.id).await?;
            assert_eq!(primaries(&current), vec![target.id]);
        }

        // The other agency is untouched
        assert_eq!(primaries(&list_images(&db, other.id).await?), vec![other_images[0].id]);

        assert!(matches!(
            set_primary(&db, 999).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_primary_on_single_image() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let agency = create_test_agency(&db, &store, "Agence", None).await?;
        let images = add_images(&db, &store, agency.id, &[png("a.png")], None).await?;

        set_primary(&db, images[0].id).await?;
        assert_eq!(primaries(&list_images(&db, agency.id).await?), vec![images[0].id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_primary_does_not_promote() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let agency = create_test_agency(&db, &store, "Agence", None).await?;
        let images = add_images(&db, &store, agency.id, &[png("a.png"), png("b.png")], None).await?;

        delete_image(&db, &store, images[0].id).await?;

        let remaining = list_images(&db, agency.id).await?;
        assert_eq!(remaining.len(), 1);
        assert!(primaries(&remaining).is_empty());
        assert!(!store
            .path_for(Category::Agencies, &images[0].image_filename)
            .exists());
        assert!(primary_image(&db, agency.id).await?.is_none());

        assert!(matches!(
            delete_image(&db, &store, images[0].id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_reorder_images_is_scoped_to_agency() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let agency = create_test_agency(&db, &store, "Agence", None).await?;
        let other = create_test_agency(&db, &store, "Autre", None).await?;
        let images = add_images(
            &db,
            &store,
            agency.id,
            &[png("a.png"), png("b.png"), png("c.png")],
            None,
        )
        .await?;
        let foreign =
            add_images(&db, &store, other.id, &[png("x.png"), png("y.png")], None).await?;

        let requested = [foreign[1].id, images[2].id, images[0].id, images[1].id];
        reorder_images(&db, agency.id, &requested).await?;

        let ordered: Vec<_> = list_images(&db, agency.id)
            .await?
            .iter()
            .map(|i| (i.id, i.sort_order))
            .collect();
        assert_eq!(
            ordered,
            vec![(images[2].id, 1), (images[0].id, 2), (images[1].id, 3)]
        );

        let foreign_after = list_images(&db, other.id).await?;
        assert_eq!(foreign_after[1].id, foreign[1].id);
        assert_eq!(foreign_after[1].sort_order, 1);
        Ok(())
    }
}
