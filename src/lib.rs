pub mod appearance;
pub mod config;
pub mod confirm;
pub mod export;
pub mod logging;
pub mod notify;
pub mod search;
pub mod store;
pub mod tui;
