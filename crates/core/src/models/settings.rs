use serde::{Deserialize, Serialize};

use super::color::ThemeColor;
use crate::errors::CoreError;

/// Host-configurable behaviour of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Name given to the watchlist created on first run or by migration.
    pub default_watchlist_name: String,

    /// Theme color used when the caller does not pick one.
    pub default_color: ThemeColor,

    /// Whether a fresh install gets the built-in starter instruments.
    /// When `false`, the first watchlist starts out empty.
    pub seed_defaults: bool,

    /// Upper bound on watchlist name length, in characters.
    pub max_watchlist_name_len: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_watchlist_name: "My Watchlist".to_string(),
            default_color: ThemeColor::default(),
            seed_defaults: true,
            max_watchlist_name_len: 64,
        }
    }
}

impl StoreSettings {
    /// Parse settings from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: StoreSettings = serde_json::from_str(json)?;
        if settings.default_watchlist_name.trim().is_empty() {
            return Err(CoreError::InvalidName(
                "default watchlist name must not be empty".into(),
            ));
        }
        Ok(settings)
    }
}
