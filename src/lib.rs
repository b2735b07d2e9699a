//! Core library surface for the score tracker TUI.
//!
//! The roster and its persistence bridge are usable without the terminal
//! front-end, which is how the integration tests drive them.
pub mod config;
pub mod error;
pub mod export;
pub mod logs;
pub mod models;
pub mod roster;
pub mod storage;
pub mod ui;

pub use config::Config;
pub use error::{PersistenceError, RosterError};
pub use export::{CsvExport, CSV_CONTENT_TYPE, DEFAULT_EXPORT_FILENAME};

/// The primary domain types other layers manipulate.
pub use models::{Player, Rank, RankedPlayer};
pub use roster::{LoadOutcome, RosterStore};

/// Persistence entry points.
pub use storage::{open_store, KeyValueStore, MemoryStore, SqliteStore, STORAGE_KEY};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
