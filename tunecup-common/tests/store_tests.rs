//! Integration tests for file-backed record stores

use tempfile::TempDir;
use tunecup_common::config::{DataFolder, StoreFiles};
use tunecup_common::{
    Competitor, Error, JsonFileStorage, MemoryStorage, RecordStorage, RecordStore, Round,
    Submission, Vote, VoteKey,
};

fn submission(track_ref: &str, submitter_id: &str, round_id: &str) -> Submission {
    Submission {
        track_ref: track_ref.to_string(),
        title: format!("Title of {}", track_ref),
        album: "Album".to_string(),
        artists: "Artist One, Artist Two".to_string(),
        submitter_id: submitter_id.to_string(),
        created_at: "2025-03-01T12:00:00Z".to_string(),
        comment: String::new(),
        round_id: round_id.to_string(),
        visible_to_voters: "Yes".to_string(),
    }
}

fn vote(track_ref: &str, voter_id: &str, points: &str, round_id: &str) -> Vote {
    Vote {
        track_ref: track_ref.to_string(),
        voter_id: voter_id.to_string(),
        created_at: "2025-03-02T12:00:00Z".to_string(),
        points_assigned: points.to_string(),
        comment: String::new(),
        round_id: round_id.to_string(),
    }
}

/// Test helper: empty league folder in a temp dir
fn setup_folder() -> (TempDir, DataFolder) {
    let temp_dir = TempDir::new().unwrap();
    let folder = DataFolder::new(temp_dir.path(), StoreFiles::default());
    folder.ensure_store_files().unwrap();
    (temp_dir, folder)
}

#[test]
fn test_open_missing_file_is_load_error() {
    let temp_dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::<Round>::new(temp_dir.path().join("rounds.json"));

    let result = RecordStore::open(storage);
    assert!(matches!(result, Err(Error::Load { store: "round", .. })));
}

#[test]
fn test_mutations_survive_reopen() {
    let (_temp_dir, folder) = setup_folder();

    let mut store = RecordStore::open(folder.submission_storage()).unwrap();
    store.add(submission("track1", "A", "R1")).unwrap();
    store.add(submission("track2", "B", "R1")).unwrap();
    store.add(submission("track3", "A", "R2")).unwrap();
    assert!(store.remove("track2").unwrap());

    let reopened = RecordStore::open(folder.submission_storage()).unwrap();
    let refs: Vec<_> = reopened.get_all().iter().map(|s| s.track_ref.as_str()).collect();
    assert_eq!(refs, vec!["track1", "track3"]);
    assert_eq!(reopened.get_by_key("track3"), Some(&submission("track3", "A", "R2")));
}

#[test]
fn test_submission_secondary_lookups_preserve_order() {
    let storage = MemoryStorage::new(vec![
        submission("t1", "A", "R1"),
        submission("t2", "B", "R1"),
        submission("t3", "A", "R2"),
        submission("t4", "A", "R1"),
    ]);
    let store = RecordStore::open(storage).unwrap();

    let by_a: Vec<_> = store.get_by_submitter_id("A").iter().map(|s| s.track_ref.clone()).collect();
    assert_eq!(by_a, vec!["t1", "t3", "t4"]);

    let in_r1: Vec<_> = store.get_by_round_id("R1").iter().map(|s| s.track_ref.clone()).collect();
    assert_eq!(in_r1, vec!["t1", "t2", "t4"]);

    assert!(store.get_by_round_id("R9").is_empty());
}

#[test]
fn test_votes_keyed_by_track_voter_round() {
    let storage = MemoryStorage::default();
    let mut store = RecordStore::open(storage.clone()).unwrap();

    assert!(store.add(vote("track1", "A", "3", "R1")).unwrap().is_some());
    // Same track and voter in another round is a different vote
    assert!(store.add(vote("track1", "A", "1", "R2")).unwrap().is_some());
    // Exact composite key collides even with different points
    assert!(store.add(vote("track1", "A", "5", "R1")).unwrap().is_none());
    assert_eq!(store.len(), 2);
    assert_eq!(storage.persisted().len(), 2);

    let key = VoteKey::new("track1", "A", "R1");
    assert_eq!(store.get_by_key(&key).unwrap().points_assigned, "3");

    assert!(store.remove(&key).unwrap());
    assert!(store.get_by_key(&key).is_none());
    assert!(!store.remove(&key).unwrap());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_vote_lookups() {
    let storage = MemoryStorage::new(vec![
        vote("t1", "A", "3", "R1"),
        vote("t2", "A", "n/a", "R1"),
        vote("t1", "B", "2", "R2"),
    ]);
    let store = RecordStore::open(storage).unwrap();

    assert_eq!(store.get_by_track_ref("t1").len(), 2);
    assert_eq!(store.get_by_voter_id("A").len(), 2);
    assert_eq!(store.get_by_round_id("R2").len(), 1);
    // Non-numeric votes stay retrievable
    assert_eq!(store.get_by_track_ref("t2")[0].points(), None);
}

#[test]
fn test_save_load_round_trip_is_identical() {
    let (_temp_dir, folder) = setup_folder();
    let storage = folder.vote_storage();

    let votes = vec![
        vote("t2", "B", "", "R1"),
        vote("t1", "A", "10", "R1"),
        vote("t1", "C", "comment as points", "R1"),
    ];
    storage.save(&votes).unwrap();

    let loaded = storage.load().unwrap();
    storage.save(&loaded).unwrap();
    assert_eq!(storage.load().unwrap(), votes);
}

#[test]
fn test_persisted_submission_schema() {
    let (_temp_dir, folder) = setup_folder();
    let storage = folder.submission_storage();
    storage.save(&[submission("track1", "A", "R1")]).unwrap();

    let raw = std::fs::read_to_string(folder.submissions_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value[0].as_object().unwrap();

    let mut fields: Vec<_> = object.keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(
        fields,
        vec![
            "album",
            "artists",
            "comment",
            "created_at",
            "round_id",
            "submitter_id",
            "title",
            "track_ref",
            "visible_to_voters",
        ]
    );
}

#[test]
fn test_loads_existing_hand_written_file() {
    let (_temp_dir, folder) = setup_folder();
    std::fs::write(
        folder.competitors_path(),
        r#"[{"id": "C2", "name": "Zed"}, {"id": "C1", "name": "Amy"}]"#,
    )
    .unwrap();

    let store = RecordStore::open(folder.competitor_storage()).unwrap();
    assert_eq!(
        store.get_all(),
        &[Competitor::new("C2", "Zed"), Competitor::new("C1", "Amy")]
    );
}

#[test]
fn test_loads_csv_export() {
    let temp_dir = TempDir::new().unwrap();
    let folder = DataFolder::new(temp_dir.path(), StoreFiles::csv());
    std::fs::write(
        folder.submissions_path(),
        "Spotify URI,Title,Album,Artist(s),Submitter ID,Created,Comment,Round ID,Visible To Voters\n\
         spotify:track:1,Song,Album,\"Artist One, Artist Two\",A,2025-03-01,,R1,Yes\n",
    )
    .unwrap();

    let store = RecordStore::open(folder.submission_storage()).unwrap();
    let loaded = store.get_by_key("spotify:track:1").unwrap();
    assert_eq!(loaded.artists, "Artist One, Artist Two");
    assert_eq!(loaded.submitter_id, "A");
    assert_eq!(loaded.visible_to_voters, "Yes");
}

#[test]
fn test_csv_mutations_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let folder = DataFolder::new(temp_dir.path(), StoreFiles::csv());
    folder.ensure_store_files().unwrap();

    let mut store = RecordStore::open(folder.vote_storage()).unwrap();
    store.add(vote("t1", "A", "n/a", "R1")).unwrap();
    store.add(vote("t1", "B", "4", "R1")).unwrap();
    assert!(store.remove(&VoteKey::new("t1", "A", "R1")).unwrap());

    let reopened = RecordStore::open(folder.vote_storage()).unwrap();
    assert_eq!(reopened.get_all(), &[vote("t1", "B", "4", "R1")]);
}
