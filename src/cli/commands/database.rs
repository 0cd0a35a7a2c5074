use anyhow::Context;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{DatabaseManager, PgStore, PortalStore};

pub async fn migrate() -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config().database)
        .await
        .context("connecting to Postgres")?;
    manager.health_check().await.context("database unreachable")?;
    manager.migrate().await.context("applying schema")?;
    manager.close().await;
    println!("Schema applied");
    Ok(())
}

pub async fn set_admin(user_id: &str, is_admin: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config().database)
        .await
        .context("connecting to Postgres")?;
    let store = PgStore::new(&manager);

    let profile = store
        .set_admin(user_id, is_admin)
        .await?
        .with_context(|| format!("no profile for '{}'; the user must sign in once first", user_id))?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "user_id": profile.user_id, "is_admin": profile.is_admin })),
        OutputFormat::Text => println!("{} is_admin={}", profile.user_id, profile.is_admin),
    }
    manager.close().await;
    Ok(())
}
