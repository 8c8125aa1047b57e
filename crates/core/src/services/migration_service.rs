use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::lookup::static_table::{StaticSymbolTable, DEFAULT_SEED_SYMBOLS};
use crate::lookup::traits::SymbolLookup;
use crate::models::item::{normalize_symbol, WatchlistItem};
use crate::models::settings::StoreSettings;
use crate::models::state::WatchlistState;
use crate::models::watchlist::Watchlist;
use crate::storage::manager::StorageManager;

/// How the store reached its ready state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Persisted multi-watchlist state was loaded.
    Loaded,
    /// The onboarding symbol list was imported into a new default watchlist.
    MigratedSymbols { imported: usize, dropped: usize },
    /// Single-list item records were imported into a new default watchlist.
    MigratedItems { imported: usize },
    /// Nothing usable was stored; a default watchlist was created.
    Seeded,
}

/// Brings the store from whatever is on disk to a usable state.
///
/// Order: persisted state → onboarding symbols → single-list records →
/// fresh seed. Initialization never fails; read and decode errors fall
/// through to the next step and write errors leave an in-memory state that
/// is retried on the next launch.
pub struct MigrationService;

impl MigrationService {
    pub fn new() -> Self {
        Self
    }

    pub fn initialize(
        &self,
        storage: &mut StorageManager,
        lookup: &dyn SymbolLookup,
        settings: &StoreSettings,
    ) -> (WatchlistState, InitOutcome) {
        match storage.load_state() {
            Ok(Some(mut state)) => {
                if state.repair_active() {
                    warn!("Active watchlist id did not resolve, using the first watchlist");
                    if let Err(e) = storage.save_state(&state) {
                        warn!(error = %e, "Failed to persist repaired active watchlist id");
                    }
                }
                Self::discard_stale_legacy(storage);
                info!(watchlists = state.watchlists.len(), "Loaded persisted watchlists");
                return (state, InitOutcome::Loaded);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Persisted watchlists unreadable, starting fresh");
            }
        }

        if let Some((state, outcome)) = self.import_legacy_symbols(storage, lookup, settings) {
            return (state, outcome);
        }
        if let Some((state, outcome)) = self.import_legacy_items(storage, settings) {
            return (state, outcome);
        }

        let state = self.seed(settings);
        Self::commit_fresh_state(storage, &state);
        info!(seeded = settings.seed_defaults, "Created default watchlist");
        (state, InitOutcome::Seeded)
    }

    /// Build the default watchlist from onboarding symbols.
    /// Unknown and repeated symbols are dropped.
    fn import_legacy_symbols(
        &self,
        storage: &mut StorageManager,
        lookup: &dyn SymbolLookup,
        settings: &StoreSettings,
    ) -> Option<(WatchlistState, InitOutcome)> {
        let symbols = match storage.load_legacy_symbols() {
            Ok(Some(symbols)) if !symbols.is_empty() => symbols,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Onboarding symbol list unreadable, skipping");
                return None;
            }
        };

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(symbols.len());
        let mut dropped = 0;
        for symbol in &symbols {
            if !seen.insert(normalize_symbol(symbol)) {
                dropped += 1;
                continue;
            }
            match lookup.lookup(symbol) {
                Some(found) => items.push(WatchlistItem::new(found.symbol, found.name, found.quote)),
                None => {
                    debug!(%symbol, lookup = lookup.name(), "Dropping unknown onboarding symbol");
                    dropped += 1;
                }
            }
        }

        let imported = items.len();
        let state = WatchlistState::single(Watchlist::with_items(
            settings.default_watchlist_name.clone(),
            settings.default_color.clone(),
            items,
        ));
        Self::commit_fresh_state(storage, &state);
        info!(imported, dropped, "Migrated onboarding symbols into default watchlist");
        Some((state, InitOutcome::MigratedSymbols { imported, dropped }))
    }

    fn import_legacy_items(
        &self,
        storage: &mut StorageManager,
        settings: &StoreSettings,
    ) -> Option<(WatchlistState, InitOutcome)> {
        let records = match storage.load_legacy_items() {
            Ok(Some(records)) if !records.is_empty() => records,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Legacy watchlist items unreadable, skipping");
                return None;
            }
        };

        let mut seen = HashSet::new();
        let items: Vec<WatchlistItem> = records
            .into_iter()
            .map(|record| record.into_item())
            .filter(|item| !item.symbol.is_empty() && seen.insert(item.symbol.clone()))
            .collect();

        let imported = items.len();
        let state = WatchlistState::single(Watchlist::with_items(
            settings.default_watchlist_name.clone(),
            settings.default_color.clone(),
            items,
        ));
        Self::commit_fresh_state(storage, &state);
        info!(imported, "Migrated legacy watchlist items into default watchlist");
        Some((state, InitOutcome::MigratedItems { imported }))
    }

    fn seed(&self, settings: &StoreSettings) -> WatchlistState {
        let items = if settings.seed_defaults {
            let builtin = StaticSymbolTable::builtin();
            DEFAULT_SEED_SYMBOLS
                .iter()
                .filter_map(|symbol| builtin.lookup(symbol))
                .map(|found| WatchlistItem::new(found.symbol, found.name, found.quote))
                .collect()
        } else {
            Vec::new()
        };
        WatchlistState::single(Watchlist::with_items(
            settings.default_watchlist_name.clone(),
            settings.default_color.clone(),
            items,
        ))
    }

    /// Persist a newly built state, then drop the legacy artifacts.
    ///
    /// The artifacts are only removed once the new state is stored, so a
    /// failed write means the import runs again next launch rather than
    /// losing the user's selection.
    fn commit_fresh_state(storage: &mut StorageManager, state: &WatchlistState) {
        if let Err(e) = storage.save_state(state) {
            warn!(error = %e, "Failed to persist initial watchlists, keeping them in memory");
            return;
        }
        if let Err(e) = storage.clear_legacy() {
            warn!(error = %e, "Failed to remove legacy watchlist artifacts");
        }
    }

    /// Artifacts left next to a valid state would never be read again.
    fn discard_stale_legacy(storage: &mut StorageManager) {
        match storage.has_legacy_artifacts() {
            Ok(true) => {
                info!("Removing legacy watchlist artifacts superseded by persisted state");
                if let Err(e) = storage.clear_legacy() {
                    warn!(error = %e, "Failed to remove legacy watchlist artifacts");
                }
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to check for legacy watchlist artifacts"),
        }
    }
}

impl Default for MigrationService {
    fn default() -> Self {
        Self::new()
    }
}
