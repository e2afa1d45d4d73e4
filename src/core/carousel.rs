//! Carousel business logic - Homepage slides and the singleton carousel settings.

use crate::{
    core::ordering::apply_manual_order,
    entities::{
        CarouselItem, CarouselSettings, carousel_item, carousel_settings,
        carousel_settings::SETTINGS_ROW_ID,
    },
    errors::{Error, Result},
    storage::{Category, FileStore, MediaKind, Upload},
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Seconds between slides for a freshly created settings row.
pub const DEFAULT_INTERVAL_SECONDS: i32 = 5;

/// Editable carousel settings.
#[derive(Debug, Clone, Copy)]
pub struct CarouselSettingsFields {
    /// Whether the carousel is shown
    pub is_active: bool,
    /// Seconds between slides, must be positive
    pub interval_seconds: i32,
    /// Whether the background video is shown
    pub show_video: bool,
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the settings row, creating it with defaults on first access.
///
/// The insert targets the fixed primary key and does nothing on conflict, so
/// concurrent first calls still leave exactly one row.
pub async fn get_or_init_settings<C>(db: &C) -> Result<carousel_settings::Model>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now().naive_utc();
    let defaults = carousel_settings::ActiveModel {
        id: Set(SETTINGS_ROW_ID),
        is_active: Set(true),
        interval_seconds: Set(DEFAULT_INTERVAL_SECONDS),
        video_filename: Set(None),
        show_video: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = CarouselSettings::insert(defaults)
        .on_conflict(
            OnConflict::column(carousel_settings::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    if inserted > 0 {
        info!("Initialized carousel settings");
    }

    CarouselSettings::find_by_id(SETTINGS_ROW_ID)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "carousel settings",
            id: SETTINGS_ROW_ID,
        })
}

/// Updates the carousel settings, optionally replacing the background video.
///
/// A video upload with a non-video extension is ignored and the current video
/// is kept. A replaced video file is removed only after the new settings commit.
///
/// # Errors
/// Returns a validation error when `interval_seconds` is not positive and
/// [`Error::Storage`] when the video cannot be written.
pub async fn update_settings(
    db: &DatabaseConnection,
    store: &FileStore,
    fields: CarouselSettingsFields,
    video: Option<Upload>,
) -> Result<carousel_settings::Model> {
    if fields.interval_seconds <= 0 {
        return Err(Error::validation(format!(
            "Carousel interval must be positive, got {}",
            fields.interval_seconds
        )));
    }

    let txn = db.begin().await?;
    let current = get_or_init_settings(&txn).await?;

    let mut video_filename = current.video_filename.clone();
    let mut stale_video = None;
    if let Some(upload) = &video {
        if let Some(handle) = store
            .save(upload, MediaKind::Video, Category::Carousel)
            .await?
        {
            stale_video = video_filename.replace(handle);
        }
    }

    let mut settings: carousel_settings::ActiveModel = current.into();
    settings.is_active = Set(fields.is_active);
    settings.interval_seconds = Set(fields.interval_seconds);
    settings.show_video = Set(fields.show_video);
    settings.video_filename = Set(video_filename);
    settings.updated_at = Set(chrono::Utc::now().naive_utc());
    let settings = settings.update(&txn).await?;
    txn.commit().await?;

    if let Some(old) = stale_video {
        store.delete(Category::Carousel, &old).await;
    }

    info!(
        "Updated carousel settings: active={}, interval={}s, video={:?}",
        settings.is_active, settings.interval_seconds, settings.video_filename
    );
    Ok(settings)
}

/// Lists every carousel item by position.
pub async fn list_items<C>(db: &C) -> Result<Vec<carousel_item::Model>>
where
    C: ConnectionTrait,
{
    CarouselItem::find()
        .order_by_asc(carousel_item::Column::SortOrder)
        .order_by_asc(carousel_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn get_item<C>(db: &C, item_id: i32) -> Result<carousel_item::Model>
where
    C: ConnectionTrait,
{
    CarouselItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "carousel item",
            id: item_id,
        })
}

/// Appends an active slide after the existing ones.
///
/// # Errors
/// Returns a validation error when the image is not an allowed image type.
pub async fn add_item(
    db: &DatabaseConnection,
    store: &FileStore,
    image: Upload,
    link_url: Option<String>,
    alt_text: Option<String>,
) -> Result<carousel_item::Model> {
    if !image.is_allowed(MediaKind::Image) {
        return Err(Error::validation(format!(
            "'{}' is not an accepted image",
            image.filename
        )));
    }

    let txn = db.begin().await?;
    let count = CarouselItem::find().count(&txn).await?;
    let sort_order =
        i32::try_from(count).map_err(|_| Error::validation("Too many carousel items"))?;

    let Some(handle) = store
        .save(&image, MediaKind::Image, Category::Carousel)
        .await?
    else {
        return Err(Error::validation(format!(
            "'{}' is not an accepted image",
            image.filename
        )));
    };

    let now = chrono::Utc::now().naive_utc();
    let item = carousel_item::ActiveModel {
        image_filename: Set(handle),
        link_url: Set(clean_optional(link_url)),
        alt_text: Set(clean_optional(alt_text)),
        is_active: Set(true),
        sort_order: Set(sort_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!("Added carousel item {} at position {}", item.id, item.sort_order);
    Ok(item)
}

/// Deletes a slide: its image first (best-effort), then the record.
pub async fn delete_item(db: &DatabaseConnection, store: &FileStore, item_id: i32) -> Result<()> {
    let txn = db.begin().await?;
    let item = get_item(&txn, item_id).await?;

    store.delete(Category::Carousel, &item.image_filename).await;
    CarouselItem::delete_by_id(item_id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted carousel item {}", item_id);
    Ok(())
}

/// Flips whether a slide is shown.
pub async fn toggle_item(db: &DatabaseConnection, item_id: i32) -> Result<carousel_item::Model> {
    let txn = db.begin().await?;
    let item = get_item(&txn, item_id).await?;

    let active = !item.is_active;
    let mut item: carousel_item::ActiveModel = item.into();
    item.is_active = Set(active);
    item.updated_at = Set(chrono::Utc::now().naive_utc());
    let item = item.update(&txn).await?;
    txn.commit().await?;

    debug!("Carousel item {} active={}", item.id, item.is_active);
    Ok(item)
}

/// Assigns `sort_order = index` to each listed slide.
pub async fn reorder_items(db: &DatabaseConnection, ordered_ids: &[i32]) -> Result<()> {
    let txn = db.begin().await?;
    let updated = apply_manual_order::<_, CarouselItem>(
        &txn,
        ordered_ids,
        carousel_item::Column::Id,
        carousel_item::Column::SortOrder,
        None,
    )
    .await?;
    txn.commit().await?;

    info!(
        "Reordered carousel: {} ids submitted, {} updated",
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

    fn settings_fields(interval_seconds: i32) -> CarouselSettingsFields {
        CarouselSettingsFields {
            is_active: true,
            interval_seconds,
            show_video: true,
        }
    }

    #[tokio::test]
    async fn test_get_or_init_settings_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = get_or_init_settings(&db).await?;
        let second = get_or_init_settings(&db).await?;
        assert_eq!(first.id, SETTINGS_ROW_ID);
        assert_eq!(first, second);
        assert!(first.is_active);
        assert_eq!(first.interval_seconds, DEFAULT_INTERVAL_SECONDS);
        assert!(first.video_filename.is_none());
        assert!(!first.show_video);
        assert_eq!(CarouselSettings::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_first_access_creates_one_row() -> Result<()> {
        let db = setup_test_db().await?;

        let (a, b) = tokio::join!(get_or_init_settings(&db), get_or_init_settings(&db));
        assert_eq!(a?.id, b?.id);
        assert_eq!(CarouselSettings::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_settings_validates_interval() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();

        for interval in [0, -3] {
            let result = update_settings(&db, &store, settings_fields(interval), None).await;
            assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        }
        assert_eq!(get_or_init_settings(&db).await?.interval_seconds, DEFAULT_INTERVAL_SECONDS);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_settings_replaces_video() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();

        let first = update_settings(
            &db,
            &store,
            settings_fields(8),
            Some(Upload::new("intro.mp4", vec![0, 1])),
        )
        .await?;
        assert_eq!(first.interval_seconds, 8);
        assert!(first.show_video);
        let old_video = first.video_filename.unwrap();

        // Not a video: ignored, current video kept
        let kept = update_settings(&db, &store, settings_fields(8), Some(png("still.png"))).await?;
        assert_eq!(kept.video_filename.as_deref(), Some(old_video.as_str()));

        let replaced = update_settings(
            &db,
            &store,
            settings_fields(3),
            Some(Upload::new("loop.WEBM", vec![2])),
        )
        .await?;
        let new_video = replaced.video_filename.unwrap();
        assert_ne!(new_video, old_video);
        assert!(!store.path_for(Category::Carousel, &old_video).exists());
        assert!(store.path_for(Category::Carousel, &new_video).exists());
        assert_eq!(stored_files(&store, Category::Carousel), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_settings_update_keeps_previous_video() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let current = update_settings(
            &db,
            &store,
            settings_fields(5),
            Some(Upload::new("intro.mp4", vec![0])),
        )
        .await?;
        let old_video = current.video_filename.clone().unwrap();

        db.execute_unprepared(
            "CREATE TRIGGER freeze_settings BEFORE UPDATE ON carousel_settings \
             BEGIN SELECT RAISE(ABORT, 'settings are frozen'); END;",
        )
        .await?;

        let result = update_settings(
            &db,
            &store,
            settings_fields(9),
            Some(Upload::new("loop.webm", vec![1])),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        assert_eq!(get_or_init_settings(&db).await?, current);
        assert!(store.path_for(Category::Carousel, &old_video).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_rejects_invalid_image() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();

        let result = add_item(&db, &store, Upload::new("slide.bmp", vec![1]), None, None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert!(list_items(&db).await?.is_empty());
        assert_eq!(stored_files(&store, Category::Carousel), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_items_append_and_reorder() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();

        let mut ids = Vec::new();
        for (index, name) in ["a.png", "b.jpg", "c.gif"].into_iter().enumerate() {
            let item = add_item(
                &db,
                &store,
                png(name),
                Some(" https://example.com ".to_string()),
                Some(String::new()),
            )
            .await?;
            assert_eq!(item.sort_order, i32::try_from(index).unwrap());
            assert_eq!(item.link_url.as_deref(), Some("https://example.com"));
            assert!(item.alt_text.is_none());
            assert!(item.is_active);
            ids.push(item.id);
        }

        reorder_items(&db, &[ids[2], ids[0], ids[1]]).await?;

        let order: Vec<_> = list_items(&db)
            .await?
            .into_iter()
            .map(|item| (item.id, item.sort_order))
            .collect();
        assert_eq!(order, vec![(ids[2], 0), (ids[0], 1), (ids[1], 2)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_and_delete_item() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = test_store();
        let item = add_item(&db, &store, png("a.png"), None, Some("Vue".to_string())).await?;

        assert!(!toggle_item(&db, item.id).await?.is_active);
        assert!(toggle_item(&db, item.id).await?.is_active);

        delete_item(&db, &store, item.id).await?;
        assert!(list_items(&db).await?.is_empty());
        assert_eq!(stored_files(&store, Category::Carousel), 0);

        assert!(matches!(
            toggle_item(&db, item.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            delete_item(&db, &store, item.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }
}
