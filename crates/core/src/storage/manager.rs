use tracing::warn;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::state::WatchlistState;

use super::backend::KeyValueStore;
use super::format::{self, LegacyItemRecord};

/// High-level storage operations: save/load the watchlist state and read or
/// clear the legacy artifacts, on top of any `KeyValueStore`.
pub struct StorageManager {
    backend: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager").finish_non_exhaustive()
    }
}

impl StorageManager {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load the persisted multi-watchlist state.
    ///
    /// Returns `Ok(None)` when nothing usable is stored (key absent or an
    /// empty array). A stored active id that fails to decode is dropped with
    /// a warning; the caller repairs it. Corrupt watchlist data is an error.
    pub fn load_state(&self) -> Result<Option<WatchlistState>, CoreError> {
        let Some(bytes) = self.backend.get(format::WATCHLISTS_KEY)? else {
            return Ok(None);
        };
        let mut watchlists = format::decode_watchlists(&bytes)?;
        if watchlists.is_empty() {
            return Ok(None);
        }
        for watchlist in &mut watchlists {
            let dropped = watchlist.dedup_symbols();
            if dropped > 0 {
                warn!(watchlist_id = %watchlist.id, dropped, "Dropped repeated symbols from persisted watchlist");
            }
        }

        let active_watchlist_id = match self.backend.get(format::ACTIVE_WATCHLIST_KEY) {
            Ok(Some(raw)) => match format::decode_active_id(&raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable active watchlist id");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read active watchlist id");
                None
            }
        };

        Ok(Some(WatchlistState {
            watchlists,
            active_watchlist_id,
        }))
    }

    /// Persist the full state.
    ///
    /// Flow: watchlists → `watchlists` key, then active id → `activeWatchlistId`.
    /// Each key is replaced atomically by the backend. If the active id write
    /// fails, the previous `watchlists` value is written back so the stored
    /// state stays as it was before the call.
    pub fn save_state(&mut self, state: &WatchlistState) -> Result<(), CoreError> {
        let watchlists = format::encode_watchlists(&state.watchlists)?;
        let previous = self.backend.get(format::WATCHLISTS_KEY)?;
        self.backend.set(format::WATCHLISTS_KEY, &watchlists)?;

        if let Err(e) = self.write_active_id(state.active_watchlist_id) {
            let restored = match &previous {
                Some(bytes) => self.backend.set(format::WATCHLISTS_KEY, bytes),
                None => self.backend.remove(format::WATCHLISTS_KEY),
            };
            if let Err(restore_err) = restored {
                warn!(error = %restore_err, "Failed to restore previous watchlists after a failed save");
            }
            return Err(e);
        }
        Ok(())
    }

    fn write_active_id(&mut self, active: Option<Uuid>) -> Result<(), CoreError> {
        match active {
            Some(id) => {
                let bytes = format::encode_active_id(id)?;
                self.backend.set(format::ACTIVE_WATCHLIST_KEY, &bytes)
            }
            None => self.backend.remove(format::ACTIVE_WATCHLIST_KEY),
        }
    }

    /// Symbols saved by onboarding, if the artifact exists.
    pub fn load_legacy_symbols(&self) -> Result<Option<Vec<String>>, CoreError> {
        self.backend
            .get(format::LEGACY_SYMBOLS_KEY)?
            .map(|bytes| format::decode_legacy_symbols(&bytes))
            .transpose()
    }

    /// Single-list item records, if the artifact exists.
    pub fn load_legacy_items(&self) -> Result<Option<Vec<LegacyItemRecord>>, CoreError> {
        self.backend
            .get(format::LEGACY_ITEMS_KEY)?
            .map(|bytes| format::decode_legacy_items(&bytes))
            .transpose()
    }

    /// Whether any legacy artifact is still stored.
    pub fn has_legacy_artifacts(&self) -> Result<bool, CoreError> {
        Ok(self.backend.contains(format::LEGACY_SYMBOLS_KEY)?
            || self.backend.contains(format::LEGACY_ITEMS_KEY)?)
    }

    /// Delete both legacy artifacts.
    pub fn clear_legacy(&mut self) -> Result<(), CoreError> {
        self.backend.remove(format::LEGACY_SYMBOLS_KEY)?;
        self.backend.remove(format::LEGACY_ITEMS_KEY)?;
        Ok(())
    }

    /// Write the onboarding symbol selection. This is what the onboarding
    /// flow does before any watchlist exists.
    pub fn save_legacy_symbols(&mut self, symbols: &[String]) -> Result<(), CoreError> {
        let bytes = format::encode_legacy_symbols(symbols)?;
        self.backend.set(format::LEGACY_SYMBOLS_KEY, &bytes)
    }

    /// Give the backend back to the caller.
    pub fn into_backend(self) -> Box<dyn KeyValueStore> {
        self.backend
    }
}
