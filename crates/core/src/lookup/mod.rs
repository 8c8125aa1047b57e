pub mod static_table;
pub mod traits;
