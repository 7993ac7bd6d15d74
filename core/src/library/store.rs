//! Persisted file-name keyed string mappings.
//!
//! Two documents live in the data directory:
//!
//! - `rom_title_cache.json` - ROM file name to normalized title
//! - `rom_image_map.json` - ROM file name to custom cover image file name
//!
//! Both are flat, pretty-printed JSON objects with sorted keys. Keys are base
//! file names (not full paths), so two ROMs with the same name in different
//! platform directories share one entry.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use super::data_dir::{DataDirProvider, IMAGES_DIR};
use super::error::{LibraryError, StoreError};

/// File name of the title cache inside the data directory.
pub const TITLE_CACHE_FILE: &str = "rom_title_cache.json";

/// File name of the image map inside the data directory.
pub const IMAGE_MAP_FILE: &str = "rom_image_map.json";

/// Reads a mapping document.
///
/// A missing file is an empty mapping. Anything that is not a JSON object of
/// strings is reported as [`LibraryError::CacheCorrupt`].
pub fn read_map(path: &Path) -> Result<BTreeMap<String, String>, LibraryError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(LibraryError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| LibraryError::CacheCorrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// A string to string mapping backed by one JSON file.
///
/// Every mutation goes through an internal lock; readers never observe a
/// half-applied change. The file is rewritten in full on each save.
#[derive(Debug)]
pub struct MapStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl MapStore {
    /// Loads the mapping at `path`.
    ///
    /// Unreadable or corrupt documents are logged and replaced by an empty
    /// mapping; the bad file is overwritten on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_map(&path) {
            Ok(entries) => {
                debug!(path = %path.display(), entries = entries.len(), "Loaded mapping");
                entries
            }
            Err(e) => {
                warn!("{}, starting empty", e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Inserts or overwrites `key` and writes the document.
    ///
    /// On a write error the in-memory value is kept.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    /// Removes `key`, writing the document only if it was present.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.lock();
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.write(&entries)?;
        Ok(true)
    }

    /// Inserts or overwrites `key` without touching the file.
    ///
    /// Pair with [`MapStore::save`] to batch many updates into one write.
    pub fn stage(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    /// Writes the current mapping to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        let entries = self.lock();
        self.write(&entries)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current mapping.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(entries).map_err(|source| StoreError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        std::fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), entries = entries.len(), "Saved mapping");
        Ok(())
    }
}

/// ROM file name to normalized display title.
///
/// Grows during scans and is never pruned: entries for deleted ROMs stay.
#[derive(Debug)]
pub struct TitleCacheStore(MapStore);

impl TitleCacheStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self(MapStore::load(path))
    }

    /// Loads `rom_title_cache.json` from a data directory.
    pub fn open_in(data_dir: &Path) -> Self {
        Self::load(data_dir.join(TITLE_CACHE_FILE))
    }
}

impl Deref for TitleCacheStore {
    type Target = MapStore;

    fn deref(&self) -> &MapStore {
        &self.0
    }
}

/// ROM file name to custom cover image file name.
///
/// Changed only by explicit user action (see [`super::CoverAssigner`]).
#[derive(Debug)]
pub struct ImageMapStore(MapStore);

impl ImageMapStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self(MapStore::load(path))
    }

    /// Loads `rom_image_map.json` from a data directory.
    pub fn open_in(data_dir: &Path) -> Self {
        Self::load(data_dir.join(IMAGE_MAP_FILE))
    }
}

impl Deref for ImageMapStore {
    type Target = MapStore;

    fn deref(&self) -> &MapStore {
        &self.0
    }
}

/// The persisted state shared by the scanner and the cover assigner.
#[derive(Debug, Clone)]
pub struct LibraryStores {
    pub titles: Arc<TitleCacheStore>,
    pub images: Arc<ImageMapStore>,
    /// Directory custom cover images are copied into
    pub images_dir: PathBuf,
}

impl LibraryStores {
    /// Loads both stores from a data directory.
    pub fn open_in(data_dir: &Path) -> Self {
        Self {
            titles: Arc::new(TitleCacheStore::open_in(data_dir)),
            images: Arc::new(ImageMapStore::open_in(data_dir)),
            images_dir: data_dir.join(IMAGES_DIR),
        }
    }

    /// Loads both stores from the provider's data directory.
    ///
    /// Returns `None` if the provider has no data directory.
    pub fn open(provider: &dyn DataDirProvider) -> Option<Self> {
        provider.data_dir().map(|dir| Self::open_in(&dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TitleCacheStore::open_in(dir.path());
        assert!(store.is_empty());
        assert_eq!(store.get("Lunar.cue"), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_get_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = TitleCacheStore::open_in(dir.path());
        store.set("Lunar (USA).cue", "Lunar").unwrap();
        assert_eq!(store.get("Lunar (USA).cue").as_deref(), Some("Lunar"));

        let reloaded = TitleCacheStore::open_in(dir.path());
        assert_eq!(reloaded.get("Lunar (USA).cue").as_deref(), Some("Lunar"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = ImageMapStore::open_in(dir.path());
        store.set("a.cue", "a.png").unwrap();
        store.set("a.cue", "a.jpg").unwrap();
        assert_eq!(store.get("a.cue").as_deref(), Some("a.jpg"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_document_is_pretty_and_sorted() {
        let dir = TempDir::new().unwrap();
        let store = TitleCacheStore::open_in(dir.path());
        store.set("b.cue", "B").unwrap();
        store.set("a.cue", "A").unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains('\n'));
        let a = content.find("a.cue").unwrap();
        let b = content.find("b.cue").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_remove_absent_key_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = ImageMapStore::open_in(dir.path());
        assert!(!store.remove("ghost.cue").unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_remove_present_key_persists() {
        let dir = TempDir::new().unwrap();
        let store = ImageMapStore::open_in(dir.path());
        store.set("a.cue", "a.png").unwrap();
        assert!(store.remove("a.cue").unwrap());

        let reloaded = ImageMapStore::open_in(dir.path());
        assert_eq!(reloaded.get("a.cue"), None);
    }

    #[test]
    fn test_stage_does_not_write_until_save() {
        let dir = TempDir::new().unwrap();
        let store = TitleCacheStore::open_in(dir.path());
        store.stage("a.cue", "A");
        assert_eq!(store.get("a.cue").as_deref(), Some("A"));
        assert!(!store.path().exists());

        store.save().unwrap();
        assert_eq!(
            TitleCacheStore::open_in(dir.path()).get("a.cue").as_deref(),
            Some("A")
        );
    }

    #[test]
    fn test_corrupt_document_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(TITLE_CACHE_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_map(&path),
            Err(LibraryError::CacheCorrupt { .. })
        ));

        let store = TitleCacheStore::load(&path);
        assert!(store.is_empty());
        store.set("a.cue", "A").unwrap();
        assert_eq!(read_map(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(IMAGE_MAP_FILE);
        std::fs::write(&path, r#"{"a.cue": 5}"#).unwrap();
        assert!(ImageMapStore::load(&path).is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory() {
        let dir = TempDir::new().unwrap();
        // The parent of the document is a regular file, so the write fails.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = TitleCacheStore::load(blocker.join(TITLE_CACHE_FILE));

        let err = store.set("a.cue", "A").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.get("a.cue").as_deref(), Some("A"));
    }

    #[test]
    fn test_library_stores_layout() {
        let dir = TempDir::new().unwrap();
        let stores = LibraryStores::open(&dir.path().to_path_buf()).unwrap();
        assert_eq!(stores.titles.path(), dir.path().join(TITLE_CACHE_FILE));
        assert_eq!(stores.images.path(), dir.path().join(IMAGE_MAP_FILE));
        assert_eq!(stores.images_dir, dir.path().join("images"));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let dir = TempDir::new().unwrap();
        let store = TitleCacheStore::open_in(dir.path());
        store.stage("a.cue", "A");
        let snapshot = store.snapshot();
        store.stage("b.cue", "B");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_absent_key_keeps_document() {
        let dir = TempDir::new().unwrap();
        let store = ImageMapStore::open_in(dir.path());
        store.set("a.cue", "a.png").unwrap();
        let before = std::fs::read(store.path()).unwrap();

        assert!(!store.remove("ghost.cue").unwrap());
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        assert_eq!(store.get("a.cue").as_deref(), Some("a.png"));
    }

    #[test]
    fn test_concurrent_writers_keep_every_entry() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(TitleCacheStore::open_in(dir.path()));

        let handles: Vec<_> = ["saturn", "psx"]
            .into_iter()
            .map(|prefix| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let key = format!("{}_{}.cue", prefix, i);
                        if i % 2 == 0 {
                            store.set(&key, prefix).unwrap();
                        } else {
                            store.stage(&key, prefix);
                            store.save().unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reloaded = TitleCacheStore::open_in(dir.path());
        assert_eq!(reloaded.len(), 50);
        assert_eq!(reloaded.get("saturn_24.cue").as_deref(), Some("saturn"));
        assert_eq!(reloaded.get("psx_13.cue").as_deref(), Some("psx"));
    }
}
