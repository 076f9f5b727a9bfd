pub mod config_io;
pub mod export;
pub mod fetch;
pub mod lock;
pub mod state;
pub mod store_io;
pub mod watcher;
