//! Integration tests for the library store

use proptest::prelude::*;
use questlog_library::{
    FileSlot, GameId, GameStatus, LibraryStore, MemorySlot, NewEntry, StatusFilter,
};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

/// Test helper holding a library file in a temporary directory
struct TestEnvironment {
    #[allow(dead_code)]
    temp_dir: TempDir,
    slot: FileSlot,
}

impl TestEnvironment {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let slot = FileSlot::new(temp_dir.path().join("data").join("library.json"));
        Self { temp_dir, slot }
    }

    fn open(&self) -> LibraryStore<FileSlot> {
        LibraryStore::open(self.slot.clone())
    }
}

fn status_strategy() -> impl Strategy<Value = GameStatus> {
    prop_oneof![
        Just(GameStatus::Playing),
        Just(GameStatus::Completed),
        Just(GameStatus::Wishlist),
        Just(GameStatus::Abandoned),
    ]
}

#[test]
fn test_end_to_end_scenario() {
    let mut store = LibraryStore::open(MemorySlot::new());
    let id = GameId::from("42");

    store
        .add_or_update(
            NewEntry::new("42", "Game", GameStatus::Wishlist)
                .with_image("img")
                .with_genres(["RPG"]),
        )
        .unwrap();

    let wishlist = store.filter(StatusFilter::Status(GameStatus::Wishlist));
    assert_eq!(wishlist.len(), 1);
    assert_eq!(wishlist[0].id, id);

    store.update_status(&id, GameStatus::Playing).unwrap();
    assert!(store.filter(StatusFilter::Status(GameStatus::Wishlist)).is_empty());
    let playing = store.filter(StatusFilter::Status(GameStatus::Playing));
    assert_eq!(playing.len(), 1);
    assert_eq!(playing[0].id, id);

    store.remove(&id).unwrap();
    assert_eq!(store.counts().all, 0);
}

#[test]
fn test_round_trip_through_file() {
    let env = TestEnvironment::new();

    let saved = {
        let mut store = env.open();
        store
            .add_or_update(
                NewEntry::new("1", "Hollow Knight", GameStatus::Completed)
                    .with_image("https://img.example/hk.jpg")
                    .with_genres(["Action", "Platformer"]),
            )
            .unwrap();
        store
            .add_or_update(NewEntry::new("2", "Outer Wilds", GameStatus::Wishlist))
            .unwrap();
        store.games().to_vec()
    };

    let reopened = env.open();
    assert_eq!(reopened.games(), saved.as_slice());
}

#[test]
fn test_explicit_save_then_load() {
    let env = TestEnvironment::new();
    let mut store = env.open();
    store
        .add_or_update(NewEntry::new("7", "Celeste", GameStatus::Playing).with_genres(["Indie"]))
        .unwrap();
    store.save().unwrap();

    let loaded = LibraryStore::<FileSlot>::load(&env.slot);
    assert_eq!(loaded, store.games());
}

#[test]
fn test_corrupt_file_starts_empty() {
    let env = TestEnvironment::new();
    fs::create_dir_all(env.slot.path().parent().unwrap()).unwrap();
    fs::write(env.slot.path(), "[{\"id\": \"1\", \"name\":").unwrap();

    let mut store = env.open();
    assert!(store.is_empty());

    // The next mutation replaces the corrupt contents.
    store
        .add_or_update(NewEntry::new("1", "Tunic", GameStatus::Playing))
        .unwrap();
    assert_eq!(env.open().len(), 1);
}

#[test]
fn test_reads_library_written_by_browser_version() {
    let env = TestEnvironment::new();
    fs::create_dir_all(env.slot.path().parent().unwrap()).unwrap();
    fs::write(
        env.slot.path(),
        r#"[{"id":"3328","name":"The Witcher 3: Wild Hunt","image":"https://media.rawg.io/w3.jpg","status":"playing","addedDate":"2024-05-10T18:22:01.123Z","genres":["Action","RPG"]}]"#,
    )
    .unwrap();

    let store = env.open();
    let game = store.get(&GameId::from("3328")).unwrap();
    assert_eq!(game.name, "The Witcher 3: Wild Hunt");
    assert_eq!(game.status, GameStatus::Playing);
    assert_eq!(game.genres, vec!["Action", "RPG"]);
}

#[test]
fn test_update_status_unknown_leaves_file_identical() {
    let env = TestEnvironment::new();
    let mut store = env.open();
    store
        .add_or_update(NewEntry::new("1", "Hades", GameStatus::Playing))
        .unwrap();
    let before = fs::read(env.slot.path()).unwrap();

    store
        .update_status(&GameId::from("nope"), GameStatus::Completed)
        .unwrap();

    assert_eq!(fs::read(env.slot.path()).unwrap(), before);
}

#[test]
fn test_remove_unknown_still_writes() {
    let slot = MemorySlot::new();
    let mut store = LibraryStore::open(&slot);
    store
        .add_or_update(NewEntry::new("1", "Hades", GameStatus::Playing))
        .unwrap();
    let before = store.games().to_vec();

    store.remove(&GameId::from("2")).unwrap();

    assert_eq!(store.games(), before.as_slice());
    assert_eq!(slot.writes(), 2);
}

#[test]
fn test_added_date_is_set_once() {
    let mut store = LibraryStore::open(MemorySlot::new());
    store
        .add_or_update(NewEntry::new("1", "Hades", GameStatus::Wishlist))
        .unwrap();
    let added = store.games()[0].added_date;

    for status in GameStatus::ALL {
        std::thread::sleep(std::time::Duration::from_millis(2));
        store
            .add_or_update(NewEntry::new("1", "Hades", status))
            .unwrap();
    }

    assert_eq!(store.games()[0].added_date, added);
}

proptest! {
    #[test]
    fn prop_upserts_keep_one_entry_per_id_and_last_status(
        calls in prop::collection::vec((0u8..6, status_strategy()), 0..40)
    ) {
        let mut store = LibraryStore::open(MemorySlot::new());
        let mut expected: HashMap<String, GameStatus> = HashMap::new();

        for (id, status) in &calls {
            let id = id.to_string();
            store
                .add_or_update(NewEntry::new(id.as_str(), format!("Game {}", id), *status))
                .unwrap();
            expected.insert(id, *status);
        }

        prop_assert_eq!(store.len(), expected.len());
        for (id, status) in &expected {
            let game = store.get(&GameId::from(id.as_str())).unwrap();
            prop_assert_eq!(game.status, *status);
        }
    }

    #[test]
    fn prop_counts_sum_to_total(
        calls in prop::collection::vec((0u8..20, status_strategy()), 0..60),
        removals in prop::collection::vec(0u8..20, 0..10)
    ) {
        let mut store = LibraryStore::open(MemorySlot::new());
        for (id, status) in &calls {
            store
                .add_or_update(NewEntry::new(id.to_string(), "Game", *status))
                .unwrap();
        }
        for id in &removals {
            store.remove(&GameId::from(id.to_string())).unwrap();
        }

        let counts = store.counts();
        prop_assert_eq!(counts.all, store.len());
        prop_assert_eq!(
            counts.all,
            counts.playing + counts.completed + counts.abandoned + counts.wishlist
        );
        for filter in StatusFilter::ALL {
            prop_assert_eq!(store.filter(filter).len(), counts.get(filter));
        }
    }

    #[test]
    fn prop_removed_id_is_never_listed(
        ids in prop::collection::vec(0u8..10, 1..20),
        target in 0u8..10
    ) {
        let mut store = LibraryStore::open(MemorySlot::new());
        for id in &ids {
            store
                .add_or_update(NewEntry::new(id.to_string(), "Game", GameStatus::Playing))
                .unwrap();
        }

        let target = GameId::from(target.to_string());
        store.remove(&target).unwrap();

        prop_assert!(store.filter(StatusFilter::All).iter().all(|g| g.id != target));
    }
}
