use std::collections::HashMap;

use super::traits::{InstrumentQuote, SymbolLookup};
use crate::models::item::{normalize_symbol, Quote};

/// Instruments known out of the box: (symbol, name, price, change, change %).
const BUILTIN: &[(&str, &str, f64, f64, f64)] = &[
    ("AAPL", "Apple Inc.", 182.52, 2.24, 1.23),
    ("MSFT", "Microsoft Corp.", 378.85, 3.32, 0.87),
    ("NVDA", "NVIDIA Corp.", 724.31, 15.42, 2.14),
    ("TSLA", "Tesla Inc.", 234.67, -4.45, -1.87),
    ("AMZN", "Amazon.com Inc.", 145.73, -0.66, -0.45),
    ("GOOGL", "Alphabet Inc.", 138.45, 1.78, 1.30),
    ("SAP", "SAP SE", 168.34, 2.15, 1.29),
    ("SIE", "Siemens AG", 178.92, 1.23, 0.69),
    ("VOW3", "Volkswagen AG", 112.45, -2.34, -2.04),
    ("BAS", "BASF SE", 45.67, 0.89, 1.99),
    ("ALV", "Allianz SE", 267.89, 3.45, 1.30),
    ("DBK", "Deutsche Bank AG", 13.45, -0.23, -1.68),
];

/// Symbols a fresh install starts with.
pub const DEFAULT_SEED_SYMBOLS: [&str; 3] = ["AAPL", "MSFT", "NVDA"];

/// In-memory lookup table.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbolTable {
    entries: HashMap<String, InstrumentQuote>,
}

impl StaticSymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-filled with the built-in instruments.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for &(symbol, name, price, change, change_percent) in BUILTIN {
            table.insert(symbol, name, Quote::new(price, change, change_percent));
        }
        table
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, symbol: &str, name: impl Into<String>, quote: Quote) {
        let symbol = normalize_symbol(symbol);
        self.entries.insert(
            symbol.clone(),
            InstrumentQuote {
                symbol,
                name: name.into(),
                quote,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SymbolLookup for StaticSymbolTable {
    fn name(&self) -> &str {
        "static"
    }

    fn lookup(&self, symbol: &str) -> Option<InstrumentQuote> {
        self.entries.get(&normalize_symbol(symbol)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_case_insensitively() {
        let table = StaticSymbolTable::builtin();
        let q = table.lookup(" aapl ").unwrap();
        assert_eq!(q.symbol, "AAPL");
        assert_eq!(q.name, "Apple Inc.");
        assert!(q.quote.is_positive());
    }

    #[test]
    fn builtin_contains_seed_symbols() {
        let table = StaticSymbolTable::builtin();
        assert_eq!(table.len(), 12);
        for symbol in DEFAULT_SEED_SYMBOLS {
            assert!(table.lookup(symbol).is_some());
        }
    }

    #[test]
    fn unknown_symbol_is_none() {
        assert!(StaticSymbolTable::builtin().lookup("ZZZZ").is_none());
    }
}
