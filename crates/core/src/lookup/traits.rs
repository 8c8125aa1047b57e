use crate::models::item::Quote;

/// Display data for a known instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentQuote {
    /// Uppercased ticker symbol (e.g., "AAPL")
    pub symbol: String,
    /// Human-readable name (e.g., "Apple Inc.")
    pub name: String,
    /// Snapshot values
    pub quote: Quote,
}

/// Read-only symbol → instrument dictionary.
///
/// Consulted by the legacy import and by add-by-symbol. Implementations
/// must match symbols case-insensitively.
pub trait SymbolLookup: Send + Sync {
    /// Human-readable name of this lookup source (for logs).
    fn name(&self) -> &str;

    /// Resolve a symbol, or `None` if it is unknown.
    fn lookup(&self, symbol: &str) -> Option<InstrumentQuote>;
}
