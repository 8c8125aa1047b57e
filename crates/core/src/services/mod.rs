pub mod migration_service;
pub mod notifier;
pub mod watchlist_service;
