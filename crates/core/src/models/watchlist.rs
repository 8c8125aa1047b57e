use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::color::ThemeColor;
use super::item::{normalize_symbol, WatchlistItem};

/// A named, ordered collection of instruments.
///
/// Item order is insertion order and is also the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "color")]
    pub theme_color: ThemeColor,
    pub items: Vec<WatchlistItem>,
    /// Snapshots written before creation times were tracked get the load time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Watchlist {
    pub fn new(name: impl Into<String>, theme_color: ThemeColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            theme_color,
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a watchlist that already holds `items`.
    pub fn with_items(
        name: impl Into<String>,
        theme_color: ThemeColor,
        items: Vec<WatchlistItem>,
    ) -> Self {
        Self {
            items,
            ..Self::new(name, theme_color)
        }
    }

    #[must_use]
    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.items.iter().any(|item| item.has_symbol(symbol))
    }

    #[must_use]
    pub fn item(&self, item_id: Uuid) -> Option<&WatchlistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Sum of all item change percentages.
    #[must_use]
    pub fn total_change_percent(&self) -> f64 {
        self.items.iter().map(|item| item.change_percent).sum()
    }

    /// Mean change percentage, `0.0` for an empty watchlist.
    #[must_use]
    pub fn average_change_percent(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.total_change_percent() / self.items.len() as f64
    }

    /// Items ordered by change percent, best first, truncated to `limit`.
    ///
    /// The sort is stable: items with equal change keep their insertion order.
    /// `-0.0` and `0.0` compare equal.
    #[must_use]
    pub fn top_performers(&self, limit: usize) -> Vec<&WatchlistItem> {
        let mut ranked: Vec<&WatchlistItem> = self.items.iter().collect();
        ranked.sort_by(|a, b| {
            b.change_percent
                .partial_cmp(&a.change_percent)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }

    /// Normalize item symbols and drop repeats, keeping the first occurrence.
    /// Returns the number of items dropped.
    pub fn dedup_symbols(&mut self) -> usize {
        let before = self.items.len();
        let mut seen = HashSet::new();
        for item in &mut self.items {
            item.symbol = normalize_symbol(&item.symbol);
        }
        self.items.retain(|item| seen.insert(item.symbol.clone()));
        before - self.items.len()
    }
}
