use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::item::{Quote, WatchlistItem};
use crate::models::watchlist::Watchlist;

/// Ordered array of every watchlist.
pub const WATCHLISTS_KEY: &str = "watchlists";

/// Id of the active watchlist.
pub const ACTIVE_WATCHLIST_KEY: &str = "activeWatchlistId";

/// Symbols picked during onboarding, written before any watchlist existed.
pub const LEGACY_SYMBOLS_KEY: &str = "initialWatchlist";

/// Item records from the single-list era, with string-formatted numbers.
pub const LEGACY_ITEMS_KEY: &str = "watchlistItems";

pub fn encode_watchlists(watchlists: &[Watchlist]) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(watchlists)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize watchlists: {e}")))
}

pub fn decode_watchlists(bytes: &[u8]) -> Result<Vec<Watchlist>, CoreError> {
    serde_json::from_slice(bytes)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize watchlists: {e}")))
}

pub fn encode_active_id(id: Uuid) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(&id)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize active id: {e}")))
}

/// Accepts a JSON string (`"…uuid…"`) as well as the bare uuid text.
pub fn decode_active_id(bytes: &[u8]) -> Result<Uuid, CoreError> {
    if let Ok(id) = serde_json::from_slice::<Uuid>(bytes) {
        return Ok(id);
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CoreError::Deserialization(format!("Active id is not UTF-8: {e}")))?;
    Uuid::parse_str(text.trim())
        .map_err(|e| CoreError::Deserialization(format!("Invalid active id '{text}': {e}")))
}

pub fn encode_legacy_symbols(symbols: &[String]) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(symbols)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize symbols: {e}")))
}

pub fn decode_legacy_symbols(bytes: &[u8]) -> Result<Vec<String>, CoreError> {
    serde_json::from_slice(bytes)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize symbols: {e}")))
}

/// Item record as written by the single-list builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyItemRecord {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub is_positive: bool,
}

impl LegacyItemRecord {
    /// Convert into a current item. Numbers that do not parse become `0.0`.
    pub fn into_item(self) -> WatchlistItem {
        let quote = Quote::new(
            parse_formatted_number(&self.price).unwrap_or(0.0),
            parse_formatted_number(&self.change).unwrap_or(0.0),
            parse_formatted_number(&self.change_percent).unwrap_or(0.0),
        );
        WatchlistItem::new(self.symbol, self.name, quote)
    }
}

pub fn decode_legacy_items(bytes: &[u8]) -> Result<Vec<LegacyItemRecord>, CoreError> {
    serde_json::from_slice(bytes)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize legacy items: {e}")))
}

/// Parse display strings such as `"$182.52"`, `"€45.67"`, `"+2.24"` or `"-1.87%"`.
pub fn parse_formatted_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '%' | '+' | ',') && !c.is_whitespace())
        .collect();
    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}
