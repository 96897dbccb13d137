use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::database::Database;

/// Returns the path to the subscriptions database
///
/// Uses `[database] path` from the config when set, otherwise the platform's local
/// data directory:
///
/// - **macOS**: `~/Library/Application Support/subtrack/subscriptions.sqlite`
/// - **Linux**: `~/.local/share/subtrack/subscriptions.sqlite`
/// - **Windows**: `%LOCALAPPDATA%\subtrack\subscriptions.sqlite`
pub fn get_db_path(config: &ApiConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = config.database_path() {
        return Ok(path);
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("subtrack").join("subscriptions.sqlite"))
}

/// Open the database and run migrations
pub fn initialize_database(config: &ApiConfig) -> anyhow::Result<Arc<Database>> {
    let db_path = get_db_path(config)?;
    let db = Database::new(&db_path)?;
    tracing::info!("Database initialized at: {:?}", db_path);
    Ok(Arc::new(db))
}
