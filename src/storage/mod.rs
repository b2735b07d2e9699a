//! Persistence bridge: a tiny key-value interface plus the snapshot codec
//! that stores the whole roster under a single key.

mod connection;
mod memory;
mod snapshot;

use crate::error::PersistenceError;

pub use connection::{open_store, SqliteStore};
pub use memory::MemoryStore;
#[cfg(test)]
pub(crate) use memory::FailingStore;
pub use snapshot::{decode_players, encode_players, load_players, save_players, STORAGE_KEY};

/// Minimal string key-value store, the shape of browser local storage.
pub trait KeyValueStore {
    /// Fetch the value stored under `key`, or `None` when nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}
