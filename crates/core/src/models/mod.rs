pub mod color;
pub mod event;
pub mod item;
pub mod settings;
pub mod state;
pub mod watchlist;
