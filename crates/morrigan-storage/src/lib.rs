//! Morrigan Storage Layer
//!
//! SQLite database handle shared with every provider through the core
//! environment as `Arc<Mutex<Database>>`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use morrigan_storage::Database;
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Database::open(&path)?;
//! let db = Arc::new(Mutex::new(db));
//!
//! // Inside a provider
//! let db = env.db.lock().await;
//! db.put_provider_value("client", "last_seen", &serde_json::json!("2026-01-01"))?;
//! ```

mod database;

pub use database::Database;

/// Default database file name.
pub const DATABASE_FILE: &str = "morrigan.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| p.join("morrigan").join(DATABASE_FILE))
}
