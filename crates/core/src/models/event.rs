use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Change notification emitted by the store after a mutation has been
/// applied and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StoreEvent {
    WatchlistCreated { watchlist_id: Uuid },
    WatchlistRenamed { watchlist_id: Uuid },
    WatchlistColorChanged { watchlist_id: Uuid },
    /// `new_active` is set when the deleted watchlist was the active one.
    WatchlistDeleted {
        watchlist_id: Uuid,
        new_active: Option<Uuid>,
    },
    ActiveWatchlistChanged { watchlist_id: Uuid },
    ItemAdded { watchlist_id: Uuid, item_id: Uuid },
    ItemRemoved { watchlist_id: Uuid, item_id: Uuid },
    ItemsReordered { watchlist_id: Uuid },
}

impl StoreEvent {
    /// The watchlist this event concerns.
    #[must_use]
    pub fn watchlist_id(&self) -> Uuid {
        match self {
            StoreEvent::WatchlistCreated { watchlist_id }
            | StoreEvent::WatchlistRenamed { watchlist_id }
            | StoreEvent::WatchlistColorChanged { watchlist_id }
            | StoreEvent::WatchlistDeleted { watchlist_id, .. }
            | StoreEvent::ActiveWatchlistChanged { watchlist_id }
            | StoreEvent::ItemAdded { watchlist_id, .. }
            | StoreEvent::ItemRemoved { watchlist_id, .. }
            | StoreEvent::ItemsReordered { watchlist_id } => *watchlist_id,
        }
    }
}

impl std::fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreEvent::WatchlistCreated { .. } => write!(f, "WatchlistCreated"),
            StoreEvent::WatchlistRenamed { .. } => write!(f, "WatchlistRenamed"),
            StoreEvent::WatchlistColorChanged { .. } => write!(f, "WatchlistColorChanged"),
            StoreEvent::WatchlistDeleted { .. } => write!(f, "WatchlistDeleted"),
            StoreEvent::ActiveWatchlistChanged { .. } => write!(f, "ActiveWatchlistChanged"),
            StoreEvent::ItemAdded { .. } => write!(f, "ItemAdded"),
            StoreEvent::ItemRemoved { .. } => write!(f, "ItemRemoved"),
            StoreEvent::ItemsReordered { .. } => write!(f, "ItemsReordered"),
        }
    }
}
