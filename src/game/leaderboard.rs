use log::{trace, warn};
use std::io;

use super::store::KeyValueStore;
use crate::model::RankingEntry;

pub const DEFAULT_LEADERBOARD_KEY: &str = "ranking";
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Best won sessions, fastest first, mirrored into a key-value store.
///
/// The in-memory entries are authoritative for the run; the store is rewritten wholesale
/// after every recorded win. Anything unreadable in the store is treated as an empty board.
pub struct Leaderboard {
    store: Box<dyn KeyValueStore>,
    key: String,
    max_entries: usize,
    entries: Vec<RankingEntry>,
    // Wins whose write failed; carried over every reload until a write succeeds.
    unsaved: Vec<RankingEntry>,
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaderboard")
            .field("key", &self.key)
            .field("max_entries", &self.max_entries)
            .field("entries", &self.entries)
            .field("unsaved", &self.unsaved)
            .finish()
    }
}

impl Leaderboard {
    pub fn new(store: Box<dyn KeyValueStore>, key: &str, max_entries: usize) -> Self {
        let mut leaderboard = Self {
            store,
            key: key.to_string(),
            max_entries,
            entries: Vec::new(),
            unsaved: Vec::new(),
        };

        leaderboard.load();
        leaderboard
    }

    /// Re-reads the stored entries. Wins recorded this run that could not be written are
    /// merged back in.
    pub fn load(&mut self) -> &[RankingEntry] {
        let mut entries = match self.store.get(&self.key) {
            Some(bytes) => match serde_json::from_slice::<Vec<RankingEntry>>(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(target: "leaderboard", "Ignoring unreadable leaderboard {:?}: {}", self.key, err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        entries.extend_from_slice(&self.unsaved);
        self.entries = entries;
        self.normalize();
        trace!(
            target: "leaderboard",
            "Loaded {} entries ({} unsaved)",
            self.entries.len(),
            self.unsaved.len()
        );
        &self.entries
    }

    fn normalize(&mut self) {
        self.entries.sort();
        self.entries.truncate(self.max_entries);
    }

    fn save(&mut self) -> io::Result<()> {
        let contents = serde_json::to_vec(&self.entries)?;
        self.store.set(&self.key, &contents)
    }

    /// Adds a won session and persists the trimmed board.
    ///
    /// The entry is kept in memory even when the write fails.
    pub fn record(&mut self, entry: RankingEntry) -> io::Result<()> {
        self.entries.push(entry);
        self.normalize();
        match self.save() {
            Ok(()) => {
                self.unsaved.clear();
                Ok(())
            }
            Err(err) => {
                self.unsaved.push(entry);
                Err(err)
            }
        }
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::store::MemoryStore;

    /// Store that accepts reads but refuses every write.
    pub struct ReadOnlyStore(pub MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<Vec<u8>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only store"))
        }
    }

    fn stored_entries(store: &MemoryStore) -> Vec<RankingEntry> {
        serde_json::from_slice(&store.get(DEFAULT_LEADERBOARD_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_absent_value_loads_empty() {
        let leaderboard = Leaderboard::new(Box::new(MemoryStore::new()), DEFAULT_LEADERBOARD_KEY, 5);
        assert!(leaderboard.entries().is_empty());
    }

    #[test]
    fn test_invalid_value_loads_empty() {
        for garbage in ["{not json", "{\"time\":3}", "[{\"attempts\":1}]", ""] {
            let store = MemoryStore::new().with_entry(DEFAULT_LEADERBOARD_KEY, garbage);
            let leaderboard = Leaderboard::new(Box::new(store), DEFAULT_LEADERBOARD_KEY, 5);
            assert!(leaderboard.entries().is_empty(), "input: {:?}", garbage);
        }
    }

    #[test]
    fn test_loaded_entries_are_sorted_and_capped() {
        let store = MemoryStore::new().with_entry(
            DEFAULT_LEADERBOARD_KEY,
            r#"[{"time":50,"attempts":2},{"time":20,"attempts":7},{"time":20,"attempts":1},{"time":90,"attempts":0}]"#,
        );
        let leaderboard = Leaderboard::new(Box::new(store), DEFAULT_LEADERBOARD_KEY, 3);

        assert_eq!(
            leaderboard.entries(),
            &[
                RankingEntry::new(20, 1),
                RankingEntry::new(20, 7),
                RankingEntry::new(50, 2),
            ]
        );
    }

    #[test]
    fn test_record_sorts_truncates_and_persists() {
        let store = MemoryStore::new();
        let mut leaderboard = Leaderboard::new(Box::new(store.clone()), DEFAULT_LEADERBOARD_KEY, 5);

        for (secs, attempts) in [(60, 3), (45, 8), (45, 2), (120, 0), (30, 5), (75, 1)] {
            leaderboard.record(RankingEntry::new(secs, attempts)).unwrap();
            assert!(leaderboard.entries().len() <= 5);
            assert!(leaderboard.entries().windows(2).all(|pair| pair[0] <= pair[1]));
        }

        let expected = vec![
            RankingEntry::new(30, 5),
            RankingEntry::new(45, 2),
            RankingEntry::new(45, 8),
            RankingEntry::new(60, 3),
            RankingEntry::new(75, 1),
        ];
        assert_eq!(leaderboard.entries(), expected.as_slice());
        assert_eq!(stored_entries(&store), expected);
    }

    #[test]
    fn test_failed_write_keeps_entry_in_memory() {
        let mut leaderboard = Leaderboard::new(
            Box::new(ReadOnlyStore(MemoryStore::new())),
            DEFAULT_LEADERBOARD_KEY,
            5,
        );

        assert!(leaderboard.record(RankingEntry::new(10, 0)).is_err());
        assert_eq!(leaderboard.entries(), &[RankingEntry::new(10, 0)]);
    }

    #[test]
    fn test_reload_keeps_unwritten_entries() {
        let store = MemoryStore::new().with_entry(DEFAULT_LEADERBOARD_KEY, r#"[{"time":30,"attempts":2}]"#);
        let mut leaderboard = Leaderboard::new(
            Box::new(ReadOnlyStore(store)),
            DEFAULT_LEADERBOARD_KEY,
            5,
        );

        assert!(leaderboard.record(RankingEntry::new(10, 0)).is_err());
        assert_eq!(
            leaderboard.load(),
            &[RankingEntry::new(10, 0), RankingEntry::new(30, 2)]
        );
        assert_eq!(
            leaderboard.load(),
            &[RankingEntry::new(10, 0), RankingEntry::new(30, 2)]
        );
    }

    #[test]
    fn test_successful_write_clears_unwritten_entries() {
        struct FlakyStore {
            inner: MemoryStore,
            failures_left: usize,
        }

        impl KeyValueStore for FlakyStore {
            fn get(&self, key: &str) -> Option<Vec<u8>> {
                self.inner.get(key)
            }

            fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
                if self.failures_left > 0 {
                    self.failures_left -= 1;
                    return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
                }
                self.inner.set(key, value)
            }
        }

        let store = MemoryStore::new();
        let mut leaderboard = Leaderboard::new(
            Box::new(FlakyStore {
                inner: store.clone(),
                failures_left: 1,
            }),
            DEFAULT_LEADERBOARD_KEY,
            5,
        );

        assert!(leaderboard.record(RankingEntry::new(10, 0)).is_err());
        leaderboard.record(RankingEntry::new(20, 0)).unwrap();
        assert_eq!(
            stored_entries(&store),
            vec![RankingEntry::new(10, 0), RankingEntry::new(20, 0)]
        );

        // The store is the only source now, so another writer's board wins on reload.
        let mut other_writer = store.clone();
        other_writer
            .set(DEFAULT_LEADERBOARD_KEY, br#"[{"time":4,"attempts":4}]"#)
            .unwrap();
        assert_eq!(leaderboard.load(), &[RankingEntry::new(4, 4)]);
    }

    #[test]
    fn test_load_replaces_memory_with_store() {
        let store = MemoryStore::new();
        let mut leaderboard = Leaderboard::new(Box::new(store.clone()), DEFAULT_LEADERBOARD_KEY, 5);
        leaderboard.record(RankingEntry::new(10, 0)).unwrap();

        let mut other_writer = store.clone();
        other_writer
            .set(DEFAULT_LEADERBOARD_KEY, br#"[{"time":4,"attempts":4}]"#)
            .unwrap();

        assert_eq!(leaderboard.load(), &[RankingEntry::new(4, 4)]);
    }
}
