// SharedPlay - social playlist sharing backend

// Comment threading - flat replies to display order
pub mod threading;

// Documents, index maps and entity records
pub mod models;

// Storage core - SQLite document store, caches, ids
pub mod core;

// Typed access layer and the operations built on it
pub mod interface;
pub mod operations;

// HTTP routes
pub mod routes;

pub mod video;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use interface::SharedPlayInterface;
pub use threading::{build_thread, ThreadBuilder, ThreadEntry, ThreadError, Threaded};
