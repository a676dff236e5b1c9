use serde::{Deserialize, Serialize};

/// Storage key for the persisted stats record.
pub const STATS_KEY: &str = "knightTourStats";

/// Best-score statistics carried across sessions.
///
/// Serialized as camelCase JSON (`gamesPlayed`, `bestScore`,
/// `minMovesToWin`), with `minMovesToWin` as `null` until a game has been
/// won. `best_score` counts squares visited, start square included;
/// `min_moves_to_win` counts moves, so a perfect tour records 24.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub games_played: u32,
    pub best_score: u32,
    pub min_moves_to_win: Option<u32>,
}

/// Where the serialized stats record lives. Persistence is fire-and-forget:
/// implementations swallow their own failures, and a failed write is
/// indistinguishable from a successful one.
pub trait StatsBackend {
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: &str);
}

/// In-memory backend for tests and the native simulation binary.
#[derive(Default)]
pub struct MemoryBackend {
    value: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsBackend for MemoryBackend {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: &str) {
        self.value = Some(value.to_string());
    }
}

/// Owns the stats record and its backend, writing the record back wholesale
/// on every change.
pub struct StatsStore {
    stats: Stats,
    backend: Box<dyn StatsBackend>,
}

impl StatsStore {
    /// Load the persisted record. Absent or malformed data falls back to
    /// defaults without surfacing an error.
    pub fn load(backend: Box<dyn StatsBackend>) -> Self {
        let stats = backend
            .read()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        StatsStore { stats, backend }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Called once per session start, including the very first.
    pub fn record_new_game(&mut self) {
        self.stats.games_played += 1;
        self.persist();
    }

    /// Raise the best score to `visited_count` if it improves on the record.
    /// Returns whether the record changed.
    pub fn record_visited_count(&mut self, visited_count: u32) -> bool {
        if visited_count <= self.stats.best_score {
            return false;
        }
        self.stats.best_score = visited_count;
        self.persist();
        true
    }

    /// Lower the minimum winning move count if `move_count` improves on it.
    /// Returns whether the record changed.
    pub fn record_win(&mut self, move_count: u32) -> bool {
        match self.stats.min_moves_to_win {
            Some(best) if move_count >= best => false,
            _ => {
                self.stats.min_moves_to_win = Some(move_count);
                self.persist();
                true
            }
        }
    }

    fn persist(&mut self) {
        if let Ok(raw) = serde_json::to_string(&self.stats) {
            self.backend.write(&raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend over a shared cell, so tests can watch what the store writes
    /// after the backend has been boxed away.
    #[derive(Clone, Default)]
    struct SharedBackend(Rc<RefCell<Option<String>>>);

    impl StatsBackend for SharedBackend {
        fn read(&self) -> Option<String> {
            self.0.borrow().clone()
        }

        fn write(&mut self, value: &str) {
            *self.0.borrow_mut() = Some(value.to_string());
        }
    }

    /// A backend whose writes all fail silently. The in-memory record must
    /// still be correct; a storage failure is not surfaced anywhere.
    struct BrokenBackend;

    impl StatsBackend for BrokenBackend {
        fn read(&self) -> Option<String> {
            None
        }

        fn write(&mut self, _value: &str) {}
    }

    fn seeded(raw: &str) -> StatsStore {
        let mut backend = MemoryBackend::new();
        backend.write(raw);
        StatsStore::load(Box::new(backend))
    }

    #[test]
    fn load_defaults_when_absent() {
        let store = StatsStore::load(Box::new(MemoryBackend::new()));
        assert_eq!(store.stats(), &Stats::default());
        assert_eq!(store.stats().min_moves_to_win, None);
    }

    #[test]
    fn load_defaults_when_malformed() {
        let store = seeded("{not json");
        assert_eq!(store.stats(), &Stats::default());
    }

    #[test]
    fn loads_previously_written_records() {
        let store = seeded(r#"{"gamesPlayed":7,"bestScore":19,"minMovesToWin":null}"#);
        assert_eq!(store.stats().games_played, 7);
        assert_eq!(store.stats().best_score, 19);
        assert_eq!(store.stats().min_moves_to_win, None);

        let store = seeded(r#"{"gamesPlayed":3,"bestScore":25,"minMovesToWin":24}"#);
        assert_eq!(store.stats().min_moves_to_win, Some(24));
    }

    #[test]
    fn serializes_camel_case_with_null_for_no_win() {
        let raw = serde_json::to_string(&Stats {
            games_played: 2,
            best_score: 10,
            min_moves_to_win: None,
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["gamesPlayed"], 2);
        assert_eq!(value["bestScore"], 10);
        assert!(value["minMovesToWin"].is_null(), "unset minimum must serialize as null");
    }

    #[test]
    fn best_score_is_monotonic() {
        let mut store = StatsStore::load(Box::new(MemoryBackend::new()));
        assert!(store.record_visited_count(5));
        assert!(!store.record_visited_count(5), "equal score is not an improvement");
        assert!(!store.record_visited_count(3));
        assert_eq!(store.stats().best_score, 5);
        assert!(store.record_visited_count(12));
        assert_eq!(store.stats().best_score, 12);
    }

    #[test]
    fn min_moves_to_win_is_monotonic() {
        let mut store = StatsStore::load(Box::new(MemoryBackend::new()));
        assert!(store.record_win(30));
        assert!(!store.record_win(30), "equal move count is not an improvement");
        assert!(!store.record_win(31));
        assert!(store.record_win(24));
        assert_eq!(store.stats().min_moves_to_win, Some(24));
    }

    #[test]
    fn new_game_always_increments() {
        let mut store = StatsStore::load(Box::new(MemoryBackend::new()));
        store.record_new_game();
        store.record_new_game();
        assert_eq!(store.stats().games_played, 2);
    }

    #[test]
    fn changes_are_persisted_wholesale() {
        let backend = SharedBackend::default();
        backend.0.borrow_mut().replace(
            r#"{"gamesPlayed":1,"bestScore":4,"minMovesToWin":null}"#.to_string(),
        );
        let mut store = StatsStore::load(Box::new(backend.clone()));
        store.record_visited_count(9);
        store.record_new_game();

        let raw = backend.0.borrow().clone().expect("a record should have been written");
        let reloaded = seeded(&raw);
        assert_eq!(reloaded.stats().games_played, 2);
        assert_eq!(reloaded.stats().best_score, 9);
        assert_eq!(reloaded.stats().min_moves_to_win, None);
    }

    #[test]
    fn failing_backend_does_not_lose_in_memory_state() {
        let mut store = StatsStore::load(Box::new(BrokenBackend));
        store.record_new_game();
        store.record_visited_count(25);
        store.record_win(24);
        assert_eq!(store.stats().games_played, 1);
        assert_eq!(store.stats().best_score, 25);
        assert_eq!(store.stats().min_moves_to_win, Some(24));
    }
}
