pub mod errors;
pub mod lookup;
pub mod models;
pub mod services;
pub mod storage;

use tracing::{debug, warn};
use uuid::Uuid;

use errors::CoreError;
use lookup::static_table::StaticSymbolTable;
use lookup::traits::SymbolLookup;
use models::{
    color::ThemeColor,
    event::StoreEvent,
    item::{Quote, WatchlistItem},
    settings::StoreSettings,
    state::WatchlistState,
    watchlist::Watchlist,
};
use services::{
    migration_service::{InitOutcome, MigrationService},
    notifier::{Notifier, SubscriptionId},
    watchlist_service::{AddItemOutcome, WatchlistService},
};
use storage::backend::KeyValueStore;
use storage::manager::StorageManager;

/// Main entry point for the watchlist core library.
///
/// Owns every watchlist, the active selection, persistence and change
/// notification. Create one per process and hand it to whatever needs it.
///
/// Mutations are applied to a copy of the state, persisted, and only then
/// made visible; a failed write leaves both memory and storage unchanged.
#[must_use]
pub struct WatchlistStore {
    state: WatchlistState,
    storage: StorageManager,
    lookup: Box<dyn SymbolLookup>,
    settings: StoreSettings,
    watchlist_service: WatchlistService,
    notifier: Notifier,
    init_outcome: InitOutcome,
}

impl std::fmt::Debug for WatchlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistStore")
            .field("watchlists", &self.state.watchlists.len())
            .field("active", &self.state.active_watchlist_id)
            .field("subscribers", &self.notifier.len())
            .field("init_outcome", &self.init_outcome)
            .finish()
    }
}

impl WatchlistStore {
    /// Open a store on `backend` with the built-in symbol table and default settings.
    pub fn open(backend: impl KeyValueStore + 'static) -> Self {
        Self::open_with(
            Box::new(backend),
            Box::new(StaticSymbolTable::builtin()),
            StoreSettings::default(),
        )
    }

    /// Open a store with an explicit symbol lookup and settings.
    ///
    /// Loads persisted state, or migrates the legacy artifacts, or seeds a
    /// default watchlist. Never fails: the store is always usable afterwards.
    pub fn open_with(
        backend: Box<dyn KeyValueStore>,
        lookup: Box<dyn SymbolLookup>,
        settings: StoreSettings,
    ) -> Self {
        let mut storage = StorageManager::new(backend);
        let (state, init_outcome) =
            MigrationService::new().initialize(&mut storage, lookup.as_ref(), &settings);

        Self {
            state,
            storage,
            lookup,
            watchlist_service: WatchlistService::new(settings.max_watchlist_name_len),
            settings,
            notifier: Notifier::new(),
            init_outcome,
        }
    }

    /// Open a store persisted as JSON files under `dir` (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_dir(dir: impl Into<std::path::PathBuf>) -> Result<Self, CoreError> {
        let backend = storage::backend::FileStore::open(dir)?;
        Ok(Self::open(backend))
    }

    /// How initialization went (loaded, migrated or seeded).
    #[must_use]
    pub fn init_outcome(&self) -> &InitOutcome {
        &self.init_outcome
    }

    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    // ── Reading ─────────────────────────────────────────────────────

    /// All watchlists in display order.
    #[must_use]
    pub fn watchlists(&self) -> &[Watchlist] {
        &self.state.watchlists
    }

    #[must_use]
    pub fn watchlist(&self, id: Uuid) -> Option<&Watchlist> {
        self.state.watchlist(id)
    }

    #[must_use]
    pub fn watchlist_count(&self) -> usize {
        self.state.watchlists.len()
    }

    #[must_use]
    pub fn active_watchlist_id(&self) -> Uuid {
        self.active_watchlist().id
    }

    /// The watchlist shown and edited by default. Initialization always
    /// leaves at least one watchlist, and the last one cannot be deleted.
    #[must_use]
    pub fn active_watchlist(&self) -> &Watchlist {
        self.state.active_or_first()
    }

    /// Items of a watchlist in display order, or `None` for an unknown id.
    #[must_use]
    pub fn items(&self, watchlist_id: Uuid) -> Option<&[WatchlistItem]> {
        self.state.watchlist(watchlist_id).map(|w| w.items.as_slice())
    }

    /// Items of the active watchlist.
    #[must_use]
    pub fn active_items(&self) -> &[WatchlistItem] {
        &self.active_watchlist().items
    }

    /// Whether `symbol` is tracked in `watchlist_id`, or in the active
    /// watchlist when no id is given. Case-insensitive.
    #[must_use]
    pub fn is_in_watchlist(&self, symbol: &str, watchlist_id: Option<Uuid>) -> bool {
        self.watchlist_service
            .is_in_watchlist(&self.state, symbol, watchlist_id)
    }

    /// The `limit` best performing items by change percent, best first.
    /// Ties keep insertion order.
    #[must_use]
    pub fn top_performers(&self, watchlist_id: Option<Uuid>, limit: usize) -> Vec<&WatchlistItem> {
        self.watchlist_service
            .top_performers(&self.state, watchlist_id, limit)
    }

    /// A copy of the full state, e.g. for snapshot comparisons.
    #[must_use]
    pub fn snapshot(&self) -> WatchlistState {
        self.state.clone()
    }

    /// Export the full state as pretty JSON (for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize watchlists: {e}")))
    }

    // ── Watchlist Management ────────────────────────────────────────

    /// Create an empty watchlist. Uses the default color when `color` is `None`.
    pub fn create_watchlist(
        &mut self,
        name: &str,
        color: Option<ThemeColor>,
    ) -> Result<Uuid, CoreError> {
        let color = color.unwrap_or_else(|| self.settings.default_color.clone());
        self.commit(|service, state| {
            let id = service.create_watchlist(state, name, color)?;
            Ok((id, Some(StoreEvent::WatchlistCreated { watchlist_id: id })))
        })
    }

    /// Make `watchlist_id` the active watchlist.
    pub fn switch_active(&mut self, watchlist_id: Uuid) -> Result<(), CoreError> {
        self.commit(|service, state| {
            let changed = service.switch_active(state, watchlist_id)?;
            let event = changed.then_some(StoreEvent::ActiveWatchlistChanged { watchlist_id });
            Ok(((), event))
        })
    }

    pub fn rename_watchlist(&mut self, watchlist_id: Uuid, new_name: &str) -> Result<(), CoreError> {
        self.commit(|service, state| {
            let changed = service.rename_watchlist(state, watchlist_id, new_name)?;
            let event = changed.then_some(StoreEvent::WatchlistRenamed { watchlist_id });
            Ok(((), event))
        })
    }

    pub fn update_color(&mut self, watchlist_id: Uuid, color: ThemeColor) -> Result<(), CoreError> {
        self.commit(|service, state| {
            let changed = service.update_color(state, watchlist_id, color)?;
            let event = changed.then_some(StoreEvent::WatchlistColorChanged { watchlist_id });
            Ok(((), event))
        })
    }

    /// Delete a watchlist. The last remaining watchlist cannot be deleted.
    /// If the deleted watchlist was active, the first remaining one becomes active.
    pub fn delete_watchlist(&mut self, watchlist_id: Uuid) -> Result<(), CoreError> {
        self.commit(|service, state| {
            let new_active = service.delete_watchlist(state, watchlist_id)?;
            Ok((
                (),
                Some(StoreEvent::WatchlistDeleted {
                    watchlist_id,
                    new_active,
                }),
            ))
        })
    }

    // ── Item Management ─────────────────────────────────────────────

    /// Add an instrument to `target` (defaults to the active watchlist).
    ///
    /// Adding a symbol that the watchlist already tracks changes nothing and
    /// returns `AddItemOutcome::AlreadyPresent`.
    pub fn add_item(
        &mut self,
        symbol: &str,
        name: &str,
        quote: Quote,
        target: Option<Uuid>,
    ) -> Result<AddItemOutcome, CoreError> {
        self.commit(|service, state| {
            let outcome = service.add_item(state, target, symbol, name, quote)?;
            let event = match outcome {
                AddItemOutcome::Added(item_id) => {
                    let watchlist_id = match target {
                        Some(id) => id,
                        None => state.active().map(|w| w.id).unwrap_or_default(),
                    };
                    Some(StoreEvent::ItemAdded {
                        watchlist_id,
                        item_id,
                    })
                }
                AddItemOutcome::AlreadyPresent(_) => None,
            };
            Ok((outcome, event))
        })
    }

    /// Add an instrument known to the symbol lookup, with its name and snapshot.
    pub fn add_symbol(
        &mut self,
        symbol: &str,
        target: Option<Uuid>,
    ) -> Result<AddItemOutcome, CoreError> {
        let found = self
            .lookup
            .lookup(symbol)
            .ok_or_else(|| CoreError::InvalidSymbol(format!("unknown symbol '{}'", symbol.trim())))?;
        self.add_item(&found.symbol, &found.name, found.quote, target)
    }

    /// Remove an item. Returns `false` if it is not in that watchlist.
    pub fn remove_item(&mut self, item_id: Uuid, from_watchlist: Uuid) -> Result<bool, CoreError> {
        self.commit(|service, state| {
            let removed = service.remove_item(state, from_watchlist, item_id)?;
            let event = removed.then_some(StoreEvent::ItemRemoved {
                watchlist_id: from_watchlist,
                item_id,
            });
            Ok((removed, event))
        })
    }

    /// Move the item at index `from` to index `to` (drag-and-drop reordering).
    pub fn move_item(&mut self, watchlist_id: Uuid, from: usize, to: usize) -> Result<(), CoreError> {
        self.commit(|service, state| {
            let moved = service.move_item(state, watchlist_id, from, to)?;
            let event = moved.then_some(StoreEvent::ItemsReordered { watchlist_id });
            Ok(((), event))
        })
    }

    // ── Observation ─────────────────────────────────────────────────

    /// Register a callback invoked after every persisted change.
    pub fn subscribe(&mut self, callback: impl Fn(&StoreEvent) + Send + 'static) -> SubscriptionId {
        self.notifier.subscribe(Box::new(callback))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Close the store and hand back its persistence backend.
    pub fn into_backend(self) -> Box<dyn KeyValueStore> {
        self.storage.into_backend()
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Run `mutate` against a copy of the state. If it reports a change
    /// (returns an event), persist the copy, swap it in and notify.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&WatchlistService, &mut WatchlistState) -> Result<(T, Option<StoreEvent>), CoreError>,
    ) -> Result<T, CoreError> {
        let mut next = self.state.clone();
        let (value, event) = match mutate(&self.watchlist_service, &mut next) {
            Ok(result) => result,
            Err(e) => {
                match &e {
                    CoreError::UnknownWatchlist(id) => {
                        warn!(watchlist_id = %id, "Operation referenced an unknown watchlist")
                    }
                    CoreError::CannotDeleteLastWatchlist => {
                        warn!("Refused to delete the last remaining watchlist")
                    }
                    other => debug!(error = %other, "Watchlist operation rejected"),
                }
                return Err(e);
            }
        };

        let Some(event) = event else {
            return Ok(value);
        };

        self.storage.save_state(&next)?;
        self.state = next;
        debug!(event = %event, watchlist_id = %event.watchlist_id(), "Watchlists updated");
        self.notifier.notify(&event);
        Ok(value)
    }
}
