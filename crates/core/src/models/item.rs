use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// Price snapshot captured when an instrument is added to a watchlist.
///
/// These are not live values; they are frozen at add-time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Last known price
    pub price: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Relative change in percent (1.23 means +1.23%)
    pub change_percent: f64,
}

impl Quote {
    pub fn new(price: f64, change: f64, change_percent: f64) -> Self {
        Self {
            price,
            change,
            change_percent,
        }
    }

    /// A zeroed snapshot, used when nothing is known about the instrument yet.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Sign of the move. Percent decides; a flat percent falls back to the
    /// absolute change, and a fully flat quote counts as positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        if self.change_percent != 0.0 {
            self.change_percent > 0.0
        } else {
            self.change >= 0.0
        }
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("price", self.price),
            ("change", self.change),
            ("changePercent", self.change_percent),
        ] {
            if !value.is_finite() {
                return Err(CoreError::Validation(format!(
                    "Quote field '{field}' must be a finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// An instrument tracked inside a watchlist.
///
/// Symbols are uppercased on creation; the uppercase form is what every
/// duplicate check compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub is_positive: bool,
}

impl WatchlistItem {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, quote: Quote) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: normalize_symbol(&symbol.into()),
            name: name.into(),
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            is_positive: quote.is_positive(),
        }
    }

    /// The snapshot values of this item.
    #[must_use]
    pub fn quote(&self) -> Quote {
        Quote::new(self.price, self.change, self.change_percent)
    }

    /// Case-insensitive symbol comparison.
    #[must_use]
    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbol == normalize_symbol(symbol)
    }
}

/// Trim and uppercase a ticker symbol.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
