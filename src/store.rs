//! Best-score store
//!
//! The store itself is external; this module fixes its contract and ships
//! two implementations (in-memory, JSON file). Each game namespaces its
//! score under a fixed key inside the shared per-user record.
//!
//! Commits are fire-and-forget: [`ScoreCommitter::dispatch`] hands the
//! write to a worker thread and returns immediately. The outcome comes back
//! later as a [`CommitEvent`] that the session drains and logs.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Game key -> best score
pub type Records = BTreeMap<String, u64>;

/// Store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score store unavailable: {0}")]
    Unavailable(String),
    #[error("score store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed score store document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a write-if-greater
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Candidate persisted; `previous` is what it replaced (0 if absent)
    Written { previous: u64 },
    /// Candidate did not beat `stored`; nothing written
    Kept { stored: u64 },
}

/// External best-score store
pub trait ScoreStore: Send + Sync {
    /// All of a user's scores; empty when the user has no record
    fn read(&self, user: &str) -> Result<Records, StoreError>;

    /// Persist `candidate` under `key` only if it beats the stored value.
    /// Other keys in the user's record are left untouched.
    fn write_if_greater(
        &self,
        user: &str,
        key: &str,
        candidate: u64,
    ) -> Result<WriteOutcome, StoreError>;
}

fn compare(stored: u64, candidate: u64) -> WriteOutcome {
    if candidate > stored {
        WriteOutcome::Written { previous: stored }
    } else {
        WriteOutcome::Kept { stored }
    }
}

/// In-process store (tests, headless runs)
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    users: Mutex<HashMap<String, Records>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's record
    pub fn insert(&self, user: &str, key: &str, score: u64) {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        users
            .entry(user.to_string())
            .or_default()
            .insert(key.to_string(), score);
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read(&self, user: &str) -> Result<Records, StoreError> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(user).cloned().unwrap_or_default())
    }

    fn write_if_greater(
        &self,
        user: &str,
        key: &str,
        candidate: u64,
    ) -> Result<WriteOutcome, StoreError> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        let record = users.entry(user.to_string()).or_default();
        let outcome = compare(record.get(key).copied().unwrap_or(0), candidate);
        if let WriteOutcome::Written { .. } = outcome {
            record.insert(key.to_string(), candidate);
        }
        Ok(outcome)
    }
}

/// On-disk document: `{ "users": { "<uid>": { "records": { "<key>": n } } } }`
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    users: Map<String, Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Score stored under `key`, or 0 when absent or not a non-negative integer
fn score_of(records: Option<&Value>, key: &str) -> u64 {
    records
        .and_then(|r| r.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// JSON-file store. Unknown fields and other games' keys are preserved on
/// write; the file is replaced atomically via a temporary sibling.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles from concurrent commits
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(doc)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn read(&self, user: &str) -> Result<Records, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let doc = self.load()?;
        let records = doc
            .users
            .get(user)
            .and_then(|u| u.get("records"))
            .and_then(Value::as_object);
        Ok(records
            .map(|m| {
                m.iter()
                    .map(|(k, v)| (k.clone(), v.as_u64().unwrap_or(0)))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn write_if_greater(
        &self,
        user: &str,
        key: &str,
        candidate: u64,
    ) -> Result<WriteOutcome, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.load()?;
        let stored = score_of(doc.users.get(user).and_then(|u| u.get("records")), key);
        let outcome = compare(stored, candidate);
        if let WriteOutcome::Written { .. } = outcome {
            let user_entry = doc
                .users
                .entry(user.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !user_entry.is_object() {
                *user_entry = Value::Object(Map::new());
            }
            if let Value::Object(user_map) = user_entry {
                let records = user_map
                    .entry("records")
                    .or_insert_with(|| Value::Object(Map::new()));
                if !records.is_object() {
                    *records = Value::Object(Map::new());
                }
                if let Value::Object(records) = records {
                    records.insert(key.to_string(), Value::from(candidate));
                }
            }
            self.save(&doc)?;
        }
        Ok(outcome)
    }
}

/// Completion report for one dispatched commit
#[derive(Debug)]
pub struct CommitEvent {
    pub game_key: &'static str,
    pub score: u64,
    pub result: Result<WriteOutcome, StoreError>,
}

/// An authenticated user on a store
#[derive(Clone)]
struct Account {
    store: Arc<dyn ScoreStore>,
    user: String,
}

/// Session-side handle on the store: reads the baseline, dispatches
/// non-blocking commits and collects their completion events.
///
/// Without an account (signed out, or no store) reads are empty and
/// commits are no-ops.
pub struct ScoreCommitter {
    account: Option<Account>,
    events_tx: Sender<CommitEvent>,
    events_rx: Receiver<CommitEvent>,
}

impl ScoreCommitter {
    pub fn new(store: Arc<dyn ScoreStore>, user: Option<String>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            account: user.map(|user| Account { store, user }),
            events_tx,
            events_rx,
        }
    }

    /// Committer with no store behind it
    pub fn offline() -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            account: None,
            events_tx,
            events_rx,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.account.is_some()
    }

    /// Best score for `key`; any failure degrades to 0
    pub fn load_best(&self, key: &str) -> u64 {
        let Some(account) = &self.account else {
            log::debug!("Not signed in; best score for {key} is 0");
            return 0;
        };
        match account.store.read(&account.user) {
            Ok(records) => records.get(key).copied().unwrap_or(0),
            Err(e) => {
                log::debug!("Best score for {key} unavailable ({e}); using 0");
                0
            }
        }
    }

    /// Start a write-if-greater without waiting for it.
    ///
    /// Returns `false` when there is nothing to write to.
    pub fn dispatch(&self, game_key: &'static str, score: u64) -> bool {
        let Some(account) = self.account.clone() else {
            return false;
        };
        let tx = self.events_tx.clone();
        let spawned = std::thread::Builder::new()
            .name("score-commit".into())
            .spawn(move || {
                let result = account
                    .store
                    .write_if_greater(&account.user, game_key, score);
                // Receiver gone means the session ended; nobody to tell
                let _ = tx.send(CommitEvent {
                    game_key,
                    score,
                    result,
                });
            });
        match spawned {
            Ok(_) => true,
            Err(e) => {
                log::error!("Could not start score commit for {game_key}: {e}");
                false
            }
        }
    }

    /// Completed commits, without blocking
    pub fn poll(&self) -> Vec<CommitEvent> {
        self.events_rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next completed commit (shutdown flush)
    pub fn wait(&self, timeout: Duration) -> Option<CommitEvent> {
        self.events_rx.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "arkanoidBest";

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "neon-arcade-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("scores.json")
    }

    #[test]
    fn test_write_if_greater_memory() {
        let store = MemoryScoreStore::new();
        store.insert("u1", KEY, 50);

        assert_eq!(
            store.write_if_greater("u1", KEY, 30).unwrap(),
            WriteOutcome::Kept { stored: 50 }
        );
        assert_eq!(store.read("u1").unwrap()[KEY], 50);

        assert_eq!(
            store.write_if_greater("u1", KEY, 80).unwrap(),
            WriteOutcome::Written { previous: 50 }
        );
        assert_eq!(store.read("u1").unwrap()[KEY], 80);
    }

    #[test]
    fn test_equal_score_is_not_written() {
        let store = MemoryScoreStore::new();
        store.insert("u1", KEY, 50);
        assert_eq!(
            store.write_if_greater("u1", KEY, 50).unwrap(),
            WriteOutcome::Kept { stored: 50 }
        );
    }

    #[test]
    fn test_merge_keeps_other_games() {
        let store = MemoryScoreStore::new();
        store.insert("u1", "spaceShooterBest", 999);
        store.write_if_greater("u1", KEY, 10).unwrap();
        let records = store.read("u1").unwrap();
        assert_eq!(records["spaceShooterBest"], 999);
        assert_eq!(records[KEY], 10);
    }

    #[test]
    fn test_absent_user_reads_empty() {
        let store = MemoryScoreStore::new();
        assert!(store.read("nobody").unwrap().is_empty());
        assert_eq!(
            store.write_if_greater("nobody", KEY, 1).unwrap(),
            WriteOutcome::Written { previous: 0 }
        );
    }

    #[test]
    fn test_json_store_round_trip_and_merge() {
        let path = temp_path("merge");
        std::fs::write(
            &path,
            r#"{ "users": { "u1": { "email": "a@b.c", "records": { "spaceShooterBest": 120, "arkanoidBest": "oops" } } } }"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);

        // Malformed value reads as zero
        assert_eq!(store.read("u1").unwrap()[KEY], 0);
        assert_eq!(
            store.write_if_greater("u1", KEY, 40).unwrap(),
            WriteOutcome::Written { previous: 0 }
        );

        let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["users"]["u1"]["email"], "a@b.c");
        assert_eq!(doc["users"]["u1"]["records"]["spaceShooterBest"], 120);
        assert_eq!(doc["users"]["u1"]["records"][KEY], 40);

        assert_eq!(
            store.write_if_greater("u1", KEY, 39).unwrap(),
            WriteOutcome::Kept { stored: 40 }
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        let store = JsonFileStore::new(&path);
        assert!(store.read("u1").unwrap().is_empty());
        store.write_if_greater("u1", KEY, 7).unwrap();
        assert_eq!(store.read("u1").unwrap()[KEY], 7);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_corrupt_file_is_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.read("u1"), Err(StoreError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_committer_offline_is_noop() {
        let committer = ScoreCommitter::offline();
        assert!(!committer.is_signed_in());
        assert_eq!(committer.load_best(KEY), 0);
        assert!(!committer.dispatch("arkanoidBest", 10));
        assert!(committer.poll().is_empty());
    }

    #[test]
    fn test_committer_signed_out_is_noop() {
        let store = Arc::new(MemoryScoreStore::new());
        store.insert("u1", KEY, 50);
        let committer = ScoreCommitter::new(store, None);
        assert_eq!(committer.load_best(KEY), 0);
        assert!(!committer.dispatch("arkanoidBest", 100));
    }

    #[test]
    fn test_committer_reports_outcome() {
        let store = Arc::new(MemoryScoreStore::new());
        store.insert("u1", KEY, 50);
        let committer = ScoreCommitter::new(store.clone(), Some("u1".into()));
        assert_eq!(committer.load_best(KEY), 50);

        assert!(committer.dispatch("arkanoidBest", 80));
        let event = committer.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(event.score, 80);
        assert_eq!(event.result.unwrap(), WriteOutcome::Written { previous: 50 });
        assert_eq!(store.read("u1").unwrap()[KEY], 80);
    }

    #[test]
    fn test_unreadable_store_degrades_to_zero() {
        let path = temp_path("unreadable");
        std::fs::write(&path, "{").unwrap();
        let committer = ScoreCommitter::new(Arc::new(JsonFileStore::new(&path)), Some("u1".into()));
        assert_eq!(committer.load_best(KEY), 0);
        let _ = std::fs::remove_file(&path);
    }
}
