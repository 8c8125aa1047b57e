use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::color::ThemeColor;
use crate::models::item::{normalize_symbol, Quote, WatchlistItem};
use crate::models::state::WatchlistState;
use crate::models::watchlist::Watchlist;

/// Result of an add request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddItemOutcome {
    /// A new item was appended.
    Added(Uuid),
    /// The symbol was already tracked; carries the existing item's id.
    AlreadyPresent(Uuid),
}

impl AddItemOutcome {
    #[must_use]
    pub fn item_id(&self) -> Uuid {
        match self {
            AddItemOutcome::Added(id) | AddItemOutcome::AlreadyPresent(id) => *id,
        }
    }

    #[must_use]
    pub fn was_added(&self) -> bool {
        matches!(self, AddItemOutcome::Added(_))
    }
}

/// Watchlist and item mutations over a `WatchlistState`.
///
/// Pure business logic, no I/O. Every method either applies its change
/// completely or returns an error with the state untouched. Methods return
/// `false` (or `AlreadyPresent`) when the request is valid but changes nothing.
pub struct WatchlistService {
    max_name_len: usize,
}

impl WatchlistService {
    pub fn new(max_name_len: usize) -> Self {
        Self { max_name_len }
    }

    /// Trim a watchlist name and check it is usable.
    pub fn validate_name(&self, name: &str) -> Result<String, CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidName("name must not be empty".into()));
        }
        let len = trimmed.chars().count();
        if len > self.max_name_len {
            return Err(CoreError::InvalidName(format!(
                "name is {len} characters long, maximum is {}",
                self.max_name_len
            )));
        }
        Ok(trimmed.to_string())
    }

    // ── Watchlists ──────────────────────────────────────────────────

    /// Append a new empty watchlist. The active selection does not change.
    pub fn create_watchlist(
        &self,
        state: &mut WatchlistState,
        name: &str,
        color: ThemeColor,
    ) -> Result<Uuid, CoreError> {
        let name = self.validate_name(name)?;
        let watchlist = Watchlist::new(name, color);
        let id = watchlist.id;
        state.watchlists.push(watchlist);
        if state.active_watchlist_id.is_none() {
            state.active_watchlist_id = Some(id);
        }
        Ok(id)
    }

    pub fn switch_active(&self, state: &mut WatchlistState, id: Uuid) -> Result<bool, CoreError> {
        if !state.contains(id) {
            return Err(CoreError::UnknownWatchlist(id));
        }
        if state.active_watchlist_id == Some(id) {
            return Ok(false);
        }
        state.active_watchlist_id = Some(id);
        Ok(true)
    }

    pub fn rename_watchlist(
        &self,
        state: &mut WatchlistState,
        id: Uuid,
        new_name: &str,
    ) -> Result<bool, CoreError> {
        let new_name = self.validate_name(new_name)?;
        let watchlist = state
            .watchlist_mut(id)
            .ok_or(CoreError::UnknownWatchlist(id))?;
        if watchlist.name == new_name {
            return Ok(false);
        }
        watchlist.name = new_name;
        Ok(true)
    }

    pub fn update_color(
        &self,
        state: &mut WatchlistState,
        id: Uuid,
        color: ThemeColor,
    ) -> Result<bool, CoreError> {
        let watchlist = state
            .watchlist_mut(id)
            .ok_or(CoreError::UnknownWatchlist(id))?;
        if watchlist.theme_color == color {
            return Ok(false);
        }
        watchlist.theme_color = color;
        Ok(true)
    }

    /// Remove a watchlist. Refused when it is the only one left.
    ///
    /// Returns the new active id when the deleted watchlist was active.
    pub fn delete_watchlist(
        &self,
        state: &mut WatchlistState,
        id: Uuid,
    ) -> Result<Option<Uuid>, CoreError> {
        let idx = state
            .watchlists
            .iter()
            .position(|w| w.id == id)
            .ok_or(CoreError::UnknownWatchlist(id))?;
        if state.watchlists.len() <= 1 {
            return Err(CoreError::CannotDeleteLastWatchlist);
        }

        state.watchlists.remove(idx);

        if state.active_watchlist_id == Some(id) || state.active_watchlist_id.is_none() {
            let first = state.watchlists.first().map(|w| w.id);
            state.active_watchlist_id = first;
            return Ok(first);
        }
        Ok(None)
    }

    // ── Items ───────────────────────────────────────────────────────

    /// Append an instrument to `target` (or the active watchlist).
    ///
    /// Adding a symbol that is already tracked is a no-op.
    pub fn add_item(
        &self,
        state: &mut WatchlistState,
        target: Option<Uuid>,
        symbol: &str,
        name: &str,
        quote: Quote,
    ) -> Result<AddItemOutcome, CoreError> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(CoreError::InvalidSymbol("symbol must not be empty".into()));
        }
        quote.validate()?;

        let target = self.resolve_target(state, target)?;
        let watchlist = state
            .watchlist_mut(target)
            .ok_or(CoreError::UnknownWatchlist(target))?;

        if let Some(existing) = watchlist.items.iter().find(|i| i.symbol == symbol) {
            return Ok(AddItemOutcome::AlreadyPresent(existing.id));
        }

        let name = match name.trim() {
            "" => symbol.clone(),
            trimmed => trimmed.to_string(),
        };
        let item = WatchlistItem::new(symbol, name, quote);
        let id = item.id;
        watchlist.items.push(item);
        Ok(AddItemOutcome::Added(id))
    }

    /// Remove an item, keeping the order of the rest.
    /// Returns `false` if the item is not in that watchlist.
    pub fn remove_item(
        &self,
        state: &mut WatchlistState,
        watchlist_id: Uuid,
        item_id: Uuid,
    ) -> Result<bool, CoreError> {
        let watchlist = state
            .watchlist_mut(watchlist_id)
            .ok_or(CoreError::UnknownWatchlist(watchlist_id))?;
        match watchlist.items.iter().position(|i| i.id == item_id) {
            Some(idx) => {
                watchlist.items.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Move the item at `from` so that it ends up at index `to`.
    pub fn move_item(
        &self,
        state: &mut WatchlistState,
        watchlist_id: Uuid,
        from: usize,
        to: usize,
    ) -> Result<bool, CoreError> {
        let watchlist = state
            .watchlist_mut(watchlist_id)
            .ok_or(CoreError::UnknownWatchlist(watchlist_id))?;
        let len = watchlist.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(CoreError::ItemIndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(false);
        }
        let item = watchlist.items.remove(from);
        watchlist.items.insert(to, item);
        Ok(true)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Whether `symbol` is tracked in `watchlist_id` (or the active watchlist).
    /// Unknown watchlists track nothing.
    #[must_use]
    pub fn is_in_watchlist(
        &self,
        state: &WatchlistState,
        symbol: &str,
        watchlist_id: Option<Uuid>,
    ) -> bool {
        Self::target_or_active(state, watchlist_id)
            .is_some_and(|w| w.contains_symbol(symbol))
    }

    /// Best performers of `watchlist_id` (or the active watchlist).
    #[must_use]
    pub fn top_performers<'a>(
        &self,
        state: &'a WatchlistState,
        watchlist_id: Option<Uuid>,
        limit: usize,
    ) -> Vec<&'a WatchlistItem> {
        Self::target_or_active(state, watchlist_id)
            .map(|w| w.top_performers(limit))
            .unwrap_or_default()
    }

    fn target_or_active(state: &WatchlistState, watchlist_id: Option<Uuid>) -> Option<&Watchlist> {
        match watchlist_id {
            Some(id) => state.watchlist(id),
            None => state.active(),
        }
    }

    fn resolve_target(&self, state: &WatchlistState, target: Option<Uuid>) -> Result<Uuid, CoreError> {
        match target {
            Some(id) if state.contains(id) => Ok(id),
            Some(id) => Err(CoreError::UnknownWatchlist(id)),
            None => state
                .active()
                .map(|w| w.id)
                .ok_or_else(|| CoreError::Validation("no watchlist exists".into())),
        }
    }
}

impl Default for WatchlistService {
    fn default() -> Self {
        Self::new(64)
    }
}
