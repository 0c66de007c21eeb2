//! In-memory record storage with optional JSON file mirroring.
//!
//! The persisted file is a convenience cache: a JSON object mapping
//! record id to `{ ciphertext, passkey_hash, created_at }`.  Loading a
//! missing or unreadable file never fails; the store starts empty and
//! the problem is logged.  An unreadable file is moved aside to
//! `<name>.corrupt-<timestamp>` before the first write replaces it.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::errors::{Result, SecureDataError};

use super::record::{Record, RecordMetadata};

/// Records for one session, keyed by record id.
#[derive(Debug, Default)]
pub struct RecordStore {
    /// Backing file, if the store is mirrored to disk.
    path: Option<PathBuf>,

    /// Set when the backing file exists but could not be read.
    unreadable: bool,

    records: HashMap<String, Record>,
}

impl RecordStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// A purely in-memory store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load records from `path`, falling back to an empty store.
    ///
    /// The returned store stays bound to `path` so `persist` writes back
    /// to the same file even when loading failed.  An unreadable file is
    /// kept: `persist` moves it aside instead of overwriting it.
    pub fn load(path: &Path) -> Self {
        let (records, unreadable) = match read_records(path) {
            Ok(records) => {
                tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
                (records, false)
            }
            Err(SecureDataError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no data file yet");
                (HashMap::new(), false)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "starting with an empty store");
                (HashMap::new(), path.is_file())
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            unreadable,
            records,
        }
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Insert a record under its id.
    pub fn put(&mut self, record: Record) {
        self.records.insert(record.id.clone(), record);
    }

    /// Look a record up by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    /// Look a record up by id, or failing that by its exact ciphertext.
    pub fn resolve(&self, id_or_ciphertext: &str) -> Option<&Record> {
        let key = id_or_ciphertext.trim();
        self.get(key)
            .or_else(|| self.records.values().find(|r| r.ciphertext == key))
    }

    /// Number of stored records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Metadata for all records, oldest first.
    pub fn list(&self) -> Vec<RecordMetadata> {
        let mut list: Vec<RecordMetadata> = self.records.values().map(Record::metadata).collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        list
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write all records to the backing file atomically.
    ///
    /// Does nothing for an in-memory store.  If the file failed to load,
    /// it is renamed aside first; when that rename fails nothing is
    /// written.
    pub fn persist(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let persistence = |e: SecureDataError| SecureDataError::Persistence {
            path: path.clone(),
            reason: e.to_string(),
        };

        if self.unreadable {
            if path.exists() {
                let backup = set_aside(path).map_err(persistence)?;
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    "moved unreadable data file aside"
                );
            }
            self.unreadable = false;
        }

        write_records(path, &self.records).map_err(persistence)
    }
}

/// Rename `path` to `<name>.corrupt-<timestamp>` next to it.
fn set_aside(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let backup = path.with_file_name(format!("{name}.corrupt-{stamp}"));
    fs::rename(path, &backup)?;
    Ok(backup)
}

fn read_records(path: &Path) -> Result<HashMap<String, Record>> {
    let contents = fs::read_to_string(path)?;
    let parsed: HashMap<String, Record> = serde_json::from_str(&contents)
        .map_err(|e| SecureDataError::SerializationError(format!("records JSON: {e}")))?;

    // The id lives in the map key, not in the record body.
    Ok(parsed
        .into_iter()
        .map(|(id, mut record)| {
            record.id.clone_from(&id);
            (id, record)
        })
        .collect())
}

/// 1. Serialize records to JSON (sorted by id for stable output).
/// 2. Write to a uniquely named temp file in the same directory.
/// 3. Rename the temp file over the target path.
fn write_records(path: &Path, records: &HashMap<String, Record>) -> Result<()> {
    let sorted: BTreeMap<&String, &Record> = records.iter().collect();
    let json = serde_json::to_vec_pretty(&sorted)
        .map_err(|e| SecureDataError::SerializationError(format!("records: {e}")))?;

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&json)?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn record(ct: &str) -> Record {
        Record::new(ct.to_string(), "ab".repeat(32), Utc::now())
    }

    #[test]
    fn put_get_count() {
        let mut store = RecordStore::in_memory();
        let r = record("ct-1");
        let id = r.id.clone();
        store.put(r);

        assert_eq!(store.count(), 1);
        assert_eq!(store.get(&id).unwrap().ciphertext, "ct-1");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn resolve_accepts_id_or_ciphertext() {
        let mut store = RecordStore::in_memory();
        let r = record("ABC:xyz");
        let id = r.id.clone();
        store.put(r);

        assert_eq!(store.resolve(&id).unwrap().id, id);
        assert_eq!(store.resolve("ABC:xyz").unwrap().id, id);
        assert_eq!(store.resolve("  ABC:xyz\n").unwrap().id, id);
        assert!(store.resolve("ABC:other").is_none());
    }

    #[test]
    fn list_is_oldest_first() {
        let mut store = RecordStore::in_memory();
        let now = Utc::now();
        let newer = Record::new("b".into(), "h".into(), now);
        let older = Record::new("a".into(), "h".into(), now - Duration::minutes(5));
        let older_id = older.id.clone();
        store.put(newer);
        store.put(older);

        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, older_id);
    }

    #[test]
    fn persist_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("encrypted_data.json");

        let mut store = RecordStore::load(&path);
        let r = record("ct-persisted");
        let id = r.id.clone();
        store.put(r.clone());
        store.persist().unwrap();

        let reloaded = RecordStore::load(&path);
        assert_eq!(reloaded.count(), 1);
        assert_eq!(reloaded.get(&id), Some(&r));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::load(&dir.path().join("nope.json"));
        assert_eq!(store.count(), 0);
        assert!(store.path().is_some());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("encrypted_data.json");
        fs::write(&path, "{ not json").unwrap();

        let store = RecordStore::load(&path);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn unreadable_file_is_moved_aside_before_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("encrypted_data.json");

        let mut store = RecordStore::load(&path);
        store.put(record("ct-old-1"));
        store.put(record("ct-old-2"));
        store.persist().unwrap();

        // One bad timestamp makes the whole file unparsable.
        let original = fs::read_to_string(&path).unwrap();
        let damaged = original.replacen("\"created_at\": \"", "\"created_at\": \"garbage", 1);
        fs::write(&path, &damaged).unwrap();

        let mut reloaded = RecordStore::load(&path);
        assert_eq!(reloaded.count(), 0);
        reloaded.put(record("ct-new"));
        reloaded.persist().unwrap();

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains("encrypted_data.json.corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), damaged);
        assert_eq!(RecordStore::load(&path).count(), 1);

        // Only the first write moves the file aside.
        reloaded.persist().unwrap();
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn unknown_record_layout_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("encrypted_data.json");
        let legacy = r#"{"QWERTY:abc": {"encrypted_text": "QWERTY:abc", "passkey": "ff"}}"#;
        fs::write(&path, legacy).unwrap();

        let mut store = RecordStore::load(&path);
        store.put(record("ct"));
        store.persist().unwrap();

        let kept = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .find(|p| p != &path)
            .unwrap();
        assert_eq!(fs::read_to_string(kept).unwrap(), legacy);
    }

    #[test]
    fn persist_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("encrypted_data.json");

        let mut store = RecordStore::load(&path);
        store.put(record("ct"));
        store.persist().unwrap();
        store.persist().unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn in_memory_persist_is_noop() {
        let mut store = RecordStore::in_memory();
        assert!(store.persist().is_ok());
        assert!(store.path().is_none());
    }

    #[test]
    fn persist_into_unwritable_location_reports_error() {
        let dir = TempDir::new().unwrap();
        // A directory sitting where the file should go makes rename fail.
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("child"), "x").unwrap();

        let mut store = RecordStore::load(&path);
        store.put(record("ct"));
        assert!(matches!(
            store.persist(),
            Err(SecureDataError::Persistence { .. })
        ));
    }
}
