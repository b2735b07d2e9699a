//! The in-memory roster and every rule that governs it. The TUI only ever
//! touches players through `RosterStore`, which keeps the two roster
//! invariants (unique ids, non-empty names) in one place.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{PersistenceError, RosterError};
use crate::export;
use crate::models::{Player, Rank, RankedPlayer};
use crate::storage::{self, KeyValueStore};

/// Result of asking the persistence bridge for a previous roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A snapshot was found and replaced the roster. Carries the player count.
    Loaded(usize),
    /// Nothing usable was stored; the roster was left as it was.
    NotFound,
}

/// Owns the canonical player list in insertion order.
#[derive(Debug, Default, Clone)]
pub struct RosterStore {
    players: Vec<Player>,
    last_id: i64,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store around an existing list, e.g. one restored from storage.
    pub fn from_players(players: Vec<Player>) -> Self {
        let mut store = Self::new();
        store.restore(players);
        store
    }

    /// Players in storage (insertion) order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Append a new player with a zero score. The name is stored as given but
    /// rejected when it is blank once trimmed.
    pub fn add_player(&mut self, name: &str) -> Result<&Player, RosterError> {
        if name.trim().is_empty() {
            return Err(RosterError::EmptyName);
        }

        let id = self.next_id().ok_or(RosterError::IdsExhausted)?;
        self.players.push(Player::new(id, name));
        info!(id, player = name, "player added");

        let index = self.players.len() - 1;
        Ok(&self.players[index])
    }

    /// Remove the player with `id`, returning it. Unknown ids are ignored.
    pub fn delete_player(&mut self, id: i64) -> Option<Player> {
        let index = self.players.iter().position(|player| player.id == id)?;
        let removed = self.players.remove(index);
        info!(id, player = %removed.name, "player removed");
        Some(removed)
    }

    /// Apply `delta` to the player's score and return the new score. Unknown
    /// ids are ignored. Scores saturate at the `i64` bounds.
    pub fn update_score(&mut self, id: i64, delta: i64) -> Option<i64> {
        let player = self.players.iter_mut().find(|player| player.id == id)?;
        player.score = player.score.saturating_add(delta);
        debug!(id, delta, score = player.score, "score updated");
        Some(player.score)
    }

    /// Zero every score without touching identity, names, avatars, or order.
    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.score = 0;
        }
        info!(players = self.players.len(), "scores reset");
    }

    /// Distinct score values, highest first.
    pub fn distinct_scores(&self) -> Vec<i64> {
        distinct_in_order(&self.sorted_by_score())
    }

    /// Players ordered by score (descending, ties in insertion order) with the
    /// first/second crowns attached. Recomputed on every call.
    pub fn derived_view(&self) -> Vec<RankedPlayer<'_>> {
        let sorted = self.sorted_by_score();
        let distinct = distinct_in_order(&sorted);

        let crowns = if distinct.len() > 1 && sorted.len() > 1 {
            Some((distinct[0], distinct[1]))
        } else {
            None
        };

        sorted
            .into_iter()
            .map(|player| {
                let rank = crowns.and_then(|(first, second)| {
                    if player.score == first {
                        Some(Rank::First)
                    } else if player.score == second {
                        Some(Rank::Second)
                    } else {
                        None
                    }
                });
                RankedPlayer { player, rank }
            })
            .collect()
    }

    /// Render the roster as CSV text in storage order.
    pub fn export_csv(&self) -> Result<String, RosterError> {
        if self.players.is_empty() {
            return Err(RosterError::EmptyRoster);
        }
        Ok(export::to_csv(&self.players))
    }

    /// Write the whole roster through the persistence bridge.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), PersistenceError> {
        storage::save_players(store, &self.players)
    }

    /// Replace the roster with the stored snapshot, if there is one. A missing
    /// or unreadable snapshot leaves the current roster untouched.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> LoadOutcome {
        match storage::load_players(store) {
            Some(players) => {
                let count = players.len();
                self.restore(players);
                LoadOutcome::Loaded(count)
            }
            None => LoadOutcome::NotFound,
        }
    }

    fn restore(&mut self, players: Vec<Player>) {
        let highest = players.iter().map(|player| player.id).max().unwrap_or(0);
        self.last_id = self.last_id.max(highest);
        self.players = players;
    }

    fn sorted_by_score(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        // `sort_by` is stable, so equal scores keep their insertion order.
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted
    }

    /// Millisecond timestamp, bumped past the last issued id so ids stay
    /// strictly increasing even within the same millisecond. `None` once the
    /// last issued id is `i64::MAX`.
    fn next_id(&mut self) -> Option<i64> {
        let floor = self.last_id.checked_add(1)?;
        let id = Utc::now().timestamp_millis().max(floor);
        self.last_id = id;
        Some(id)
    }
}

fn distinct_in_order(sorted: &[&Player]) -> Vec<i64> {
    let mut distinct: Vec<i64> = Vec::new();
    for player in sorted {
        if distinct.last() != Some(&player.score) {
            distinct.push(player.score);
        }
    }
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStore, MemoryStore};

    fn roster_with(scores: &[(&str, i64)]) -> RosterStore {
        let mut roster = RosterStore::new();
        for (name, score) in scores {
            let id = roster.add_player(name).unwrap().id;
            roster.update_score(id, *score);
        }
        roster
    }

    fn ids(roster: &RosterStore) -> Vec<i64> {
        roster.players().iter().map(|p| p.id).collect()
    }

    #[test]
    fn add_player_appends_with_zero_score() {
        let mut roster = RosterStore::new();
        let player = roster.add_player("  Ann ").unwrap().clone();
        assert_eq!(roster.len(), 1);
        assert_eq!(player.name, "  Ann ");
        assert_eq!(player.score, 0);
        assert!(!player.avatar_url.is_empty());
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut roster = RosterStore::new();
        assert_eq!(roster.add_player(""), Err(RosterError::EmptyName));
        assert_eq!(roster.add_player("   "), Err(RosterError::EmptyName));
        assert!(roster.is_empty());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut roster = RosterStore::new();
        for name in ["a", "b", "c", "d", "e"] {
            roster.add_player(name).unwrap();
        }
        let ids = ids(&roster);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn delete_keeps_relative_order() {
        let mut roster = roster_with(&[("A", 0), ("B", 0), ("C", 0)]);
        let before = ids(&roster);
        let removed = roster.delete_player(before[1]).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(ids(&roster), vec![before[0], before[2]]);
        assert!(roster.delete_player(before[1]).is_none());
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut roster = roster_with(&[("A", 3)]);
        let snapshot = roster.players().to_vec();
        assert_eq!(roster.update_score(-1, 10), None);
        assert_eq!(roster.delete_player(-1), None);
        assert_eq!(roster.players(), snapshot.as_slice());
    }

    #[test]
    fn score_deltas_are_additive_and_unbounded_below() {
        let mut roster = roster_with(&[("A", 0), ("B", 0)]);
        let a = roster.players()[0].id;
        let b = roster.players()[1].id;
        roster.update_score(a, 17);
        roster.update_score(a, -40);
        roster.update_score(b, -23);
        assert_eq!(roster.get(a).unwrap().score, roster.get(b).unwrap().score);
        assert_eq!(roster.get(a).unwrap().score, -23);
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let mut roster = roster_with(&[("A", 0)]);
        let id = roster.players()[0].id;
        roster.update_score(id, i64::MAX);
        assert_eq!(roster.update_score(id, 1), Some(i64::MAX));
    }

    #[test]
    fn reset_only_touches_scores() {
        let mut roster = roster_with(&[("A", 10), ("B", -5), ("C", 0)]);
        let before = roster.players().to_vec();
        roster.reset_scores();
        for (old, new) in before.iter().zip(roster.players()) {
            assert_eq!(new.score, 0);
            assert_eq!((old.id, &old.name, &old.avatar_url), (new.id, &new.name, &new.avatar_url));
        }
    }

    #[test]
    fn derived_view_shares_crowns_between_ties() {
        let roster = roster_with(&[("A", 10), ("B", 10), ("C", 5)]);
        let view = roster.derived_view();
        let names: Vec<&str> = view.iter().map(|row| row.player.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(roster.distinct_scores(), vec![10, 5]);
        let ranks: Vec<Option<Rank>> = view.iter().map(|row| row.rank).collect();
        assert_eq!(ranks, vec![Some(Rank::First), Some(Rank::First), Some(Rank::Second)]);
    }

    #[test]
    fn derived_view_sorts_descending_with_stable_ties() {
        let roster = roster_with(&[("low", -5), ("tie1", 20), ("mid", 5), ("tie2", 20), ("zero", 0)]);
        let view = roster.derived_view();
        let names: Vec<&str> = view.iter().map(|row| row.player.name.as_str()).collect();
        assert_eq!(names, vec!["tie1", "tie2", "mid", "zero", "low"]);
        let ranks: Vec<Option<Rank>> = view.iter().map(|row| row.rank).collect();
        assert_eq!(
            ranks,
            vec![Some(Rank::First), Some(Rank::First), Some(Rank::Second), None, None]
        );
        // Display order never leaks into storage order.
        assert_eq!(roster.players()[0].name, "low");
    }

    #[test]
    fn no_crowns_for_a_single_distinct_score() {
        let roster = roster_with(&[("A", 7), ("B", 7), ("C", 7)]);
        assert!(roster.derived_view().iter().all(|row| row.rank.is_none()));
    }

    #[test]
    fn no_crown_for_a_lone_player() {
        let roster = roster_with(&[("Solo", 100)]);
        let view = roster.derived_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].rank, None);
    }

    #[test]
    fn export_refuses_an_empty_roster() {
        assert_eq!(RosterStore::new().export_csv(), Err(RosterError::EmptyRoster));
    }

    #[test]
    fn export_uses_storage_order() {
        let roster = roster_with(&[("Ann", 5), ("Bo", -3), ("Cy", 50)]);
        assert_eq!(
            roster.export_csv().unwrap(),
            "Name,Score\r\nAnn,5\r\nBo,-3\r\nCy,50\r\n"
        );
    }

    #[test]
    fn load_without_snapshot_keeps_roster() {
        let store = MemoryStore::new();
        let mut roster = roster_with(&[("A", 1)]);
        assert_eq!(roster.load(&store), LoadOutcome::NotFound);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn load_moves_id_generator_past_restored_ids() {
        let store = MemoryStore::new();
        let far_future = Player::new(i64::MAX - 10, "Future");
        RosterStore::from_players(vec![far_future.clone()])
            .save(&store)
            .unwrap();

        let mut roster = RosterStore::new();
        assert_eq!(roster.load(&store), LoadOutcome::Loaded(1));
        let added = roster.add_player("Next").unwrap().id;
        assert!(added > far_future.id);
    }

    #[test]
    fn exhausted_id_space_refuses_new_players() {
        let mut roster = RosterStore::from_players(vec![Player::new(i64::MAX, "Max")]);
        assert_eq!(roster.add_player("Next"), Err(RosterError::IdsExhausted));
        assert_eq!(ids(&roster), vec![i64::MAX]);
    }

    #[test]
    fn failed_save_leaves_roster_intact() {
        let roster = roster_with(&[("Ann", 5), ("Bo", -3)]);
        let before = roster.players().to_vec();
        assert!(matches!(
            roster.save(&FailingStore),
            Err(PersistenceError::Io(_))
        ));
        assert_eq!(roster.players(), before.as_slice());
    }

    #[test]
    fn unreadable_store_loads_as_not_found() {
        let mut roster = roster_with(&[("Ann", 5)]);
        let before = roster.players().to_vec();
        assert_eq!(roster.load(&FailingStore), LoadOutcome::NotFound);
        assert_eq!(roster.players(), before.as_slice());
    }
}
