use std::collections::HashSet;

use tracing::{debug, error, warn};

use super::KeyValueStore;
use crate::error::PersistenceError;
use crate::models::Player;

/// The single key under which the roster snapshot lives.
pub const STORAGE_KEY: &str = "gameScoreTrackerData";

/// Serialize players to the stored JSON array format.
pub fn encode_players(players: &[Player]) -> Result<String, PersistenceError> {
    serde_json::to_string(players).map_err(PersistenceError::Encode)
}

/// Parse a stored snapshot and check the roster invariants (unique ids and
/// non-empty names) before handing it back.
pub fn decode_players(raw: &str) -> Result<Vec<Player>, PersistenceError> {
    let players: Vec<Player> = serde_json::from_str(raw).map_err(PersistenceError::Decode)?;

    let mut seen = HashSet::with_capacity(players.len());
    for player in &players {
        if !seen.insert(player.id) {
            return Err(PersistenceError::CorruptSnapshot(format!(
                "duplicate player id {}",
                player.id
            )));
        }
        if player.name.trim().is_empty() {
            return Err(PersistenceError::CorruptSnapshot(format!(
                "player {} has an empty name",
                player.id
            )));
        }
    }

    Ok(players)
}

/// Store the full roster under [`STORAGE_KEY`].
pub fn save_players(store: &dyn KeyValueStore, players: &[Player]) -> Result<(), PersistenceError> {
    let data = encode_players(players)?;
    store.set(STORAGE_KEY, &data).inspect_err(|err| {
        error!(error = %err, "failed to save players");
    })?;
    debug!(players = players.len(), bytes = data.len(), "roster saved");
    Ok(())
}

/// Read the roster back. Anything that goes wrong (missing key, backend
/// failure, unparseable or invalid snapshot) collapses to `None` so callers
/// can keep their current state.
pub fn load_players(store: &dyn KeyValueStore) -> Option<Vec<Player>> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no saved roster found");
            return None;
        }
        Err(err) => {
            error!(error = %err, "failed to read saved roster");
            return None;
        }
    };

    match decode_players(&raw) {
        Ok(players) => {
            debug!(players = players.len(), "roster loaded");
            Some(players)
        }
        Err(err) => {
            warn!(error = %err, "ignoring unreadable saved roster");
            None
        }
    }
}
