pub mod error;
pub mod favorites;
pub mod history;
pub mod models;
pub mod users;

pub use error::{Result, StoreError};
pub use users::verify_password;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// The three independent JSON documents the store manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Users,
    Favorites,
    History,
}

impl Document {
    pub const ALL: [Document; 3] = [Document::Users, Document::Favorites, Document::History];

    pub fn file_name(self) -> &'static str {
        match self {
            Document::Users => "users.json",
            Document::Favorites => "favorites.json",
            Document::History => "history.json",
        }
    }
}

/// Flat-file JSON store. One mutex per document serializes read-modify-write
/// cycles within this process; nothing protects against a second process.
pub struct Database {
    dir: PathBuf,
    users: Mutex<()>,
    favorites: Mutex<()>,
    history: Mutex<()>,
}

impl Database {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let db = Self {
            dir: dir.to_path_buf(),
            users: Mutex::new(()),
            favorites: Mutex::new(()),
            history: Mutex::new(()),
        };

        for doc in Document::ALL {
            let empty = match fs::metadata(db.path(doc)) {
                Ok(meta) => meta.len() == 0,
                Err(e) if e.kind() == ErrorKind::NotFound => true,
                Err(e) => return Err(e.into()),
            };
            if empty {
                db.write(doc, &serde_json::Map::new())?;
            }
        }

        info!("Data store opened at {}", dir.display());
        Ok(db)
    }

    pub fn path(&self, doc: Document) -> PathBuf {
        self.dir.join(doc.file_name())
    }

    /// Load a document. A missing, empty or malformed file reads as the
    /// empty mapping; malformed content is logged and otherwise ignored.
    pub fn read<T>(&self, doc: Document) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.load(doc).0
    }

    /// Replace a document wholesale.
    fn write<T: Serialize>(&self, doc: Document, data: &T) -> Result<()> {
        let _guard = self.lock(doc)?;
        self.write_unlocked(doc, data)
    }

    /// Read, mutate and persist a document while holding its lock. Malformed
    /// content is copied to `<name>.json.bak` before it is overwritten.
    pub fn update<T, R, F>(&self, doc: Document, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.lock(doc)?;
        let (mut data, malformed): (T, bool) = self.load(doc);
        if malformed {
            let backup = self.backup_path(doc);
            fs::copy(self.path(doc), &backup)?;
            warn!(
                "Overwriting malformed document {}, previous content kept at {}",
                doc.file_name(),
                backup.display()
            );
        }
        let out = f(&mut data);
        self.write_unlocked(doc, &data)?;
        Ok(out)
    }

    pub fn backup_path(&self, doc: Document) -> PathBuf {
        self.path(doc).with_extension("json.bak")
    }

    // The flag is set only when the file exists with content that does not parse.
    fn load<T>(&self, doc: Document) -> (T, bool)
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(doc);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return (T::default(), false),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return (T::default(), false);
            }
        };

        if raw.trim().is_empty() {
            return (T::default(), false);
        }

        match serde_json::from_str(&raw) {
            Ok(data) => (data, false),
            Err(e) => {
                warn!("Malformed document {}, treating as empty: {}", path.display(), e);
                (T::default(), true)
            }
        }
    }

    fn lock(&self, doc: Document) -> Result<MutexGuard<'_, ()>> {
        let mutex = match doc {
            Document::Users => &self.users,
            Document::Favorites => &self.favorites,
            Document::History => &self.history,
        };
        mutex.lock().map_err(|_| StoreError::LockPoisoned(doc.file_name()))
    }

    // Write to a sibling temp file, then rename over the target so a crash
    // mid-write leaves the previous document in place.
    fn write_unlocked<T: Serialize>(&self, doc: Document, data: &T) -> Result<()> {
        let path = self.path(doc);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    type Doc = BTreeMap<u64, Vec<String>>;

    #[test]
    fn open_initializes_empty_documents() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("data")).unwrap();

        for doc in Document::ALL {
            let raw = fs::read_to_string(db.path(doc)).unwrap();
            assert_eq!(raw, "{}");
        }
    }

    #[test]
    fn open_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("favorites.json"), r#"{"1": []}"#).unwrap();

        let db = Database::open(dir.path()).unwrap();
        let raw = fs::read_to_string(db.path(Document::Favorites)).unwrap();
        assert_eq!(raw, r#"{"1": []}"#);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        fs::remove_file(db.path(Document::History)).unwrap();

        let doc: Doc = db.read(Document::History);
        assert!(doc.is_empty());
    }

    #[test]
    fn empty_and_malformed_files_read_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        fs::write(db.path(Document::Users), "   \n").unwrap();
        let doc: Doc = db.read(Document::Users);
        assert!(doc.is_empty());

        fs::write(db.path(Document::Users), "{not json").unwrap();
        let doc: Doc = db.read(Document::Users);
        assert!(doc.is_empty());
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        let mut doc = Doc::new();
        doc.insert(7, vec!["a".into(), "b".into()]);
        db.write(Document::Favorites, &doc).unwrap();

        let back: Doc = db.read(Document::Favorites);
        assert_eq!(back, doc);
        assert!(!db.path(Document::Favorites).with_extension("json.tmp").exists());
    }

    #[test]
    fn update_keeps_backup_of_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        fs::write(db.path(Document::Favorites), "{\"1\": [\"Paris\"").unwrap();

        db.update(Document::Favorites, |doc: &mut Doc| {
            doc.entry(2).or_default().push("Oslo".into());
        })
        .unwrap();

        let backup = fs::read_to_string(db.backup_path(Document::Favorites)).unwrap();
        assert_eq!(backup, "{\"1\": [\"Paris\"");

        let back: Doc = db.read(Document::Favorites);
        assert_eq!(back.len(), 1);
        assert_eq!(back.get(&2), Some(&vec!["Oslo".to_string()]));
    }

    #[test]
    fn update_of_valid_document_leaves_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        db.update(Document::Users, |doc: &mut Doc| doc.insert(1, Vec::new()))
            .unwrap();
        assert!(!db.backup_path(Document::Users).exists());
    }

    #[test]
    fn update_persists_mutation_and_returns_value() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        let len = db
            .update(Document::History, |doc: &mut Doc| {
                doc.entry(1).or_default().push("x".into());
                doc.len()
            })
            .unwrap();
        assert_eq!(len, 1);

        let back: Doc = db.read(Document::History);
        assert_eq!(back.get(&1), Some(&vec!["x".to_string()]));
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let db = std::sync::Arc::new(Database::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = db.clone();
                std::thread::spawn(move || {
                    db.update(Document::Favorites, |doc: &mut Doc| {
                        doc.entry(1).or_default().push(format!("item-{i}"));
                    })
                    .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let back: Doc = db.read(Document::Favorites);
        assert_eq!(back.get(&1).map(Vec::len), Some(8));
    }
}
