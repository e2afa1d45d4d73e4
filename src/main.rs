use agency_directory::{
    config::{AppSettings, database, seed},
    core::contact::dashboard_stats,
    errors::Result,
    i18n::Translator,
    setup::initialize_application,
    storage::FileStore,
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since vars can be set externally
    dotenv().ok();
    let settings = AppSettings::from_env();
    info!("Loaded settings: {:?}", settings);

    // 3. Translations are optional at setup time
    match Translator::load(&settings.translations_dir, &settings.default_language) {
        Ok(translator) => info!(
            "Available languages: {:?}",
            translator.available_languages()
        ),
        Err(e) => warn!("Translations unavailable: {}", e),
    }

    // 4. Connect and initialize
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect(|_| info!("Connected to database."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    let seed = seed::load_or_default(&settings.seed_config)?;
    let store = FileStore::new(&settings.upload_folder);
    let report = initialize_application(&db, &store, &seed)
        .await
        .inspect_err(|e| error!("Application setup failed: {}", e))?;

    // 5. Summary
    let stats = dashboard_stats(&db).await?;
    info!(
        "Ready: {} plans and {} agencies seeded this run; {} agencies ({} active), {} unread messages",
        report.plans_created,
        report.agencies_created,
        stats.total_agencies,
        stats.active_agencies,
        stats.unread_messages
    );
    Ok(())
}
