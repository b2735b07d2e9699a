//! Domain models shared by the roster, the persistence layer, and the TUI.
//! These stay plain data holders; the mutation rules live in `roster`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Seed-based placeholder image service used for player avatars.
const AVATAR_BASE_URL: &str = "https://picsum.photos/seed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single participant on the score board.
///
/// The serialized field names match the stored snapshot format, hence the
/// camelCase rename on the avatar.
pub struct Player {
    /// Stable identifier assigned at creation and never reused.
    pub id: i64,
    /// Display name, always non-empty.
    pub name: String,
    /// Current score. Only ever changed by applying a delta or a reset.
    pub score: i64,
    /// Avatar reference derived from `id` when the player was created.
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
}

impl Player {
    /// Build a fresh player with a zero score and the avatar derived from `id`.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            avatar_url: avatar_url_for(id),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Deterministic avatar reference for a player id. Equal ids always map to
/// the same URL and distinct ids to distinct URLs.
pub fn avatar_url_for(id: i64) -> String {
    format!("{AVATAR_BASE_URL}/{id}/100")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Crown shown next to the top two distinct scores.
pub enum Rank {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One row of the derived view: a borrowed player plus its crown, if any.
pub struct RankedPlayer<'a> {
    pub player: &'a Player,
    pub rank: Option<Rank>,
}
