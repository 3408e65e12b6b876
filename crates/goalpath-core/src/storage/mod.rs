//! Persistence seam and on-disk storage.
//!
//! The engine consumes [`ItemStore`]; [`Database`] is the SQLite-backed
//! implementation, and [`AppConfig`] holds TOML preferences. The engine
//! itself does no query pushdown: it fetches everything and filters in
//! memory, so the trait stays deliberately small.

mod config;
pub mod database;

pub use config::AppConfig;
pub use database::Database;

use std::path::PathBuf;

use crate::error::StoreError;
use crate::item::{Category, Item};

/// Persistence collaborator consumed by the engine.
///
/// `save` must commit all passed entities atomically: either every
/// mutation is observable by subsequent fetches, or none is.
pub trait ItemStore {
    fn fetch_all_items(&self) -> Result<Vec<Item>, StoreError>;
    fn fetch_all_categories(&self) -> Result<Vec<Category>, StoreError>;
    fn save(&self, categories: &[Category], items: &[Item]) -> Result<(), StoreError>;
    fn delete_item(&self, id: &str) -> Result<(), StoreError>;
    /// Deletes the category and cascades to its contained items.
    fn delete_category(&self, id: &str) -> Result<(), StoreError>;
}

/// Returns `~/.config/goalpath[-dev]/` based on GOALPATH_ENV.
///
/// Set GOALPATH_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("GOALPATH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("goalpath-dev")
    } else {
        base_dir.join("goalpath")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
