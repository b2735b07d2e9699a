use score_tracker::{
    CsvExport, KeyValueStore, LoadOutcome, MemoryStore, Rank, RosterError, RosterStore,
    SqliteStore, DEFAULT_EXPORT_FILENAME, STORAGE_KEY,
};

fn roster_with(scores: &[(&str, i64)]) -> RosterStore {
    let mut roster = RosterStore::new();
    for (name, score) in scores {
        let id = roster.add_player(name).unwrap().id;
        roster.update_score(id, *score);
    }
    roster
}

#[test]
fn valid_names_grow_the_roster_by_one() {
    let mut roster = RosterStore::new();
    for (count, name) in ["Ann", "Bo", " Cy ", "Dee Dee"].iter().enumerate() {
        let player = roster.add_player(name).unwrap().clone();
        assert_eq!(roster.len(), count + 1);
        assert_eq!(player.score, 0);
        assert!(!player.avatar_url.is_empty());
    }
}

#[test]
fn blank_names_leave_roster_unchanged() {
    let mut roster = roster_with(&[("Ann", 0)]);
    for name in ["", "   ", "\t\n"] {
        assert_eq!(roster.add_player(name).unwrap_err(), RosterError::EmptyName);
    }
    assert_eq!(roster.len(), 1);
}

#[test]
fn repeated_deletes_are_harmless() {
    let mut roster = roster_with(&[("Ann", 4), ("Bo", 2)]);
    let id = roster.players()[0].id;
    assert!(roster.delete_player(id).is_some());
    let after_first = roster.players().to_vec();
    assert!(roster.delete_player(id).is_none());
    assert_eq!(roster.players(), after_first.as_slice());
}

#[test]
fn two_updates_equal_one_combined_update() {
    let mut split = roster_with(&[("Ann", 0)]);
    let mut combined = split.clone();
    let id = split.players()[0].id;

    split.update_score(id, 20);
    split.update_score(id, -35);
    combined.update_score(id, -15);

    assert_eq!(split.players(), combined.players());
}

#[test]
fn ranking_example_from_three_players() {
    let roster = roster_with(&[("A", 10), ("B", 10), ("C", 5)]);
    let view = roster.derived_view();

    let names: Vec<&str> = view.iter().map(|row| row.player.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(roster.distinct_scores(), [10, 5]);
    assert_eq!(view[0].rank, Some(Rank::First));
    assert_eq!(view[1].rank, Some(Rank::First));
    assert_eq!(view[2].rank, Some(Rank::Second));
}

#[test]
fn equal_scores_get_no_crowns() {
    let roster = roster_with(&[("A", 7), ("B", 7), ("C", 7)]);
    assert!(roster.derived_view().iter().all(|row| row.rank.is_none()));

    let solo = roster_with(&[("Solo", 100)]);
    assert_eq!(solo.derived_view()[0].rank, None);
}

#[test]
fn save_and_load_round_trip_through_sqlite() {
    let store = SqliteStore::in_memory().unwrap();
    let saved = roster_with(&[("Ann", 30), ("Bo", -10), ("Cy", 0)]);
    saved.save(&store).unwrap();

    let mut restored = RosterStore::new();
    assert_eq!(restored.load(&store), LoadOutcome::Loaded(3));
    assert_eq!(restored.players(), saved.players());
}

#[test]
fn empty_roster_round_trips() {
    let store = MemoryStore::new();
    RosterStore::new().save(&store).unwrap();

    let mut restored = roster_with(&[("Stale", 1)]);
    assert_eq!(restored.load(&store), LoadOutcome::Loaded(0));
    assert!(restored.is_empty());
}

#[test]
fn corrupt_snapshot_loads_as_not_found() {
    let store = MemoryStore::new();
    store.set(STORAGE_KEY, "[{\"id\": \"oops\"}]").unwrap();

    let mut roster = roster_with(&[("Ann", 3)]);
    assert_eq!(roster.load(&store), LoadOutcome::NotFound);
    assert_eq!(roster.len(), 1);
}

#[test]
fn csv_export_is_byte_exact() {
    let roster = roster_with(&[("Ann", 5), ("Bo", -3)]);
    let export = CsvExport::from_roster(&roster, DEFAULT_EXPORT_FILENAME).unwrap();
    assert_eq!(export.body, "Name,Score\r\nAnn,5\r\nBo,-3\r\n");
    assert_eq!(export.content_type, "text/csv");
    assert_eq!(export.filename, "game-scores.csv");
}

#[test]
fn csv_export_of_empty_roster_is_refused() {
    let roster = RosterStore::new();
    assert_eq!(roster.export_csv(), Err(RosterError::EmptyRoster));
    assert!(CsvExport::from_roster(&roster, DEFAULT_EXPORT_FILENAME).is_err());
}

#[test]
fn names_keep_their_spacing_through_save_and_export() {
    let store = MemoryStore::new();
    let roster = roster_with(&[(" Ann ", 0)]);
    assert_eq!(roster.export_csv().unwrap(), "Name,Score\r\n Ann ,0\r\n");

    roster.save(&store).unwrap();
    let mut restored = RosterStore::new();
    assert_eq!(restored.load(&store), LoadOutcome::Loaded(1));
    assert_eq!(restored.players()[0].name, " Ann ");
}
