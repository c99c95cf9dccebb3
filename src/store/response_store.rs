//! Persistent question → answer store
//!
//! The whole mapping lives in memory behind an `RwLock`; every mutation
//! rewrites the backing file through a temporary sibling plus rename while the
//! write lock is held, so concurrent upserts serialize and a reader never sees
//! a half-written file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use super::codec::{decode_record, encode_record};
use super::normalize_question;
use crate::errors::{AskError, Result};

/// Point-in-time copy of every stored entry, keyed by normalized question
pub type StoreSnapshot = BTreeMap<String, String>;

/// File-backed response store
#[derive(Debug)]
pub struct ResponseStore {
    path: PathBuf,
    entries: RwLock<StoreSnapshot>,
}

impl ResponseStore {
    /// Open the store at `path`, loading any existing entries.
    ///
    /// A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = Self::load(&path)?;
        debug!(path = %path.display(), entries = entries.len(), "response store loaded");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Read the persisted entries from `path`.
    ///
    /// Malformed lines are skipped. Later lines win over earlier ones with the
    /// same normalized question.
    pub fn load(path: &Path) -> Result<StoreSnapshot> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreSnapshot::new()),
            Err(e) => return Err(AskError::store(path, e)),
        };

        let mut entries = StoreSnapshot::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match decode_record(line) {
                Some((question, answer)) => {
                    let key = normalize_question(&question);
                    if key.is_empty() {
                        warn!(line = index + 1, "skipping stored record with empty question");
                        continue;
                    }
                    entries.insert(key, answer.trim().to_string());
                }
                None => {
                    warn!(line = index + 1, "skipping stored record without delimiter");
                }
            }
        }

        Ok(entries)
    }

    /// Exact lookup on the normalized question
    pub fn lookup(&self, question: &str) -> Option<String> {
        let key = normalize_question(question);
        self.read_entries().get(&key).cloned()
    }

    /// Whether an answer exists for the question
    pub fn contains(&self, question: &str) -> bool {
        let key = normalize_question(question);
        self.read_entries().contains_key(&key)
    }

    /// Insert or overwrite an answer and persist the full mapping.
    ///
    /// The in-memory view only changes once the file has been replaced, so a
    /// failed write leaves both in their previous state. Returns the updated
    /// snapshot.
    pub fn upsert(&self, question: &str, answer: &str) -> Result<StoreSnapshot> {
        let key = normalize_question(question);
        if key.is_empty() {
            return Err(AskError::store(&self.path, "refusing to store an empty question"));
        }

        let mut guard = self
            .entries
            .write()
            .map_err(|_| AskError::store(&self.path, "store lock poisoned"))?;

        let mut updated = guard.clone();
        updated.insert(key, answer.trim().to_string());
        Self::persist(&self.path, &updated)?;
        *guard = updated.clone();

        debug!(path = %self.path.display(), entries = updated.len(), "response store flushed");
        Ok(updated)
    }

    /// Copy of all entries
    pub fn entries(&self) -> StoreSnapshot {
        self.read_entries().clone()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, StoreSnapshot> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(path: &Path, entries: &StoreSnapshot) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AskError::store(path, e))?;
            }
        }

        let tmp_path = temp_path_for(path);
        let write_result = (|| -> std::io::Result<()> {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for (question, answer) in entries {
                writeln!(writer, "{}", encode_record(question, answer))?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        })();

        if let Err(e) = write_result.and_then(|_| fs::rename(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(AskError::store(path, e));
        }

        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "responses".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_store() -> (ResponseStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ResponseStore::open(temp_dir.path().join("responses.txt")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let (store, _temp) = create_test_store();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_upsert_then_lookup_any_case() {
        let (store, _temp) = create_test_store();
        store.upsert("  What Is Rust ", "A language.").unwrap();

        assert_eq!(store.lookup("what is rust"), Some("A language.".to_string()));
        assert_eq!(store.lookup("WHAT IS RUST"), Some("A language.".to_string()));
        assert_eq!(store.lookup("what is rust?"), None);
    }

    #[test]
    fn test_upsert_returns_updated_snapshot() {
        let (store, _temp) = create_test_store();
        store.upsert("first", "one").unwrap();
        let snapshot = store.upsert("second", "two").unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("second"), Some(&"two".to_string()));
    }

    #[test]
    fn test_last_write_wins() {
        let (store, _temp) = create_test_store();
        store.upsert("capital of france", "Lyon").unwrap();
        store.upsert("Capital of France", "Paris").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("capital of france"), Some("Paris".to_string()));
    }

    #[test]
    fn test_entries_survive_reopen() {
        let (store, temp) = create_test_store();
        store.upsert("a|b", "contains the delimiter").unwrap();
        store.upsert("plain", "  padded answer  ").unwrap();

        let reopened = ResponseStore::open(temp.path().join("responses.txt")).unwrap();
        assert_eq!(reopened.lookup("a|b"), Some("contains the delimiter".to_string()));
        assert_eq!(reopened.lookup("plain"), Some("padded answer".to_string()));
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("responses.txt");
        fs::write(&path, "hello|Hi there!\nno delimiter here\n\n|orphan answer\nBYE |Take care!\n").unwrap();

        let entries = ResponseStore::load(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("hello"), Some(&"Hi there!".to_string()));
        assert_eq!(entries.get("bye"), Some(&"Take care!".to_string()));
    }

    #[test]
    fn test_empty_question_rejected() {
        let (store, _temp) = create_test_store();
        assert!(store.upsert("   ", "nothing").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        fs::create_dir(&data_dir).unwrap();

        let store = ResponseStore::open(data_dir.join("responses.txt")).unwrap();
        fs::remove_dir(&data_dir).unwrap();
        fs::write(&data_dir, "file").unwrap();

        let err = store.upsert("question", "answer").unwrap_err();

        assert!(matches!(err, AskError::StoreError { .. }));
        assert!(store.lookup("question").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (store, temp) = create_test_store();
        store.upsert("q", "a").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_concurrent_upserts_keep_every_entry() {
        let (store, temp) = create_test_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..10 {
                        store
                            .upsert(&format!("question {} {}", i, j), &format!("answer {}", j))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reloaded = ResponseStore::load(&temp.path().join("responses.txt")).unwrap();
        assert_eq!(reloaded.len(), 80);
        assert_eq!(store.len(), 80);
    }
}
