use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::watchlist::Watchlist;

/// The main data container. Everything in here is persisted and restored
/// across application restarts.
///
/// Once initialization has finished, `active_watchlist_id` always names a
/// member of `watchlists` and `watchlists` is never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistState {
    /// All watchlists, in display order
    pub watchlists: Vec<Watchlist>,

    /// The watchlist shown and edited by default
    pub active_watchlist_id: Option<Uuid>,
}

impl WatchlistState {
    /// Build a state with a single watchlist that is also active.
    pub fn single(watchlist: Watchlist) -> Self {
        let id = watchlist.id;
        Self {
            watchlists: vec![watchlist],
            active_watchlist_id: Some(id),
        }
    }

    #[must_use]
    pub fn watchlist(&self, id: Uuid) -> Option<&Watchlist> {
        self.watchlists.iter().find(|w| w.id == id)
    }

    pub fn watchlist_mut(&mut self, id: Uuid) -> Option<&mut Watchlist> {
        self.watchlists.iter_mut().find(|w| w.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.watchlists.iter().any(|w| w.id == id)
    }

    /// The active watchlist, falling back to the first one if the stored id
    /// does not resolve.
    #[must_use]
    pub fn active(&self) -> Option<&Watchlist> {
        self.active_watchlist_id
            .and_then(|id| self.watchlist(id))
            .or_else(|| self.watchlists.first())
    }

    /// The active watchlist of an initialized state, falling back to the
    /// first one.
    ///
    /// `watchlists` is never empty once initialization has finished; calling
    /// this on an empty state panics.
    #[must_use]
    pub fn active_or_first(&self) -> &Watchlist {
        self.active_watchlist_id
            .and_then(|id| self.watchlist(id))
            .unwrap_or_else(|| &self.watchlists[0])
    }

    /// Point `active_watchlist_id` at a valid member again.
    /// Returns `true` if the id had to be changed.
    pub fn repair_active(&mut self) -> bool {
        let valid = self
            .active_watchlist_id
            .is_some_and(|id| self.contains(id));
        if valid {
            return false;
        }
        self.active_watchlist_id = self.watchlists.first().map(|w| w.id);
        true
    }
}
