//! ROM directory scanning
//!
//! Walks one platform's root directory recursively and turns every media
//! file into a [`GameRecord`]. Titles come from the title cache or the
//! normalizer; covers come from the image map.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use megadeck_shared::{Cover, GameRecord, PlatformDescriptor, PlatformId, resolve};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::error::LibraryError;
use super::store::{ImageMapStore, LibraryStores, TitleCacheStore};
use super::title::normalize_title;

/// Builds game records for a platform from its ROM directory.
///
/// Holds shared handles to the two stores; cloning the scanner is cheap.
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    titles: Arc<TitleCacheStore>,
    images: Arc<ImageMapStore>,
    images_dir: PathBuf,
}

impl LibraryScanner {
    pub fn new(stores: &LibraryStores) -> Self {
        Self {
            titles: Arc::clone(&stores.titles),
            images: Arc::clone(&stores.images),
            images_dir: stores.images_dir.clone(),
        }
    }

    /// Scans `root` for media of `platform`.
    ///
    /// An unset, empty or missing root yields an empty list; the reason is
    /// logged. Use [`LibraryScanner::try_scan`] to see it.
    pub fn scan(&self, platform: PlatformId, root: Option<&Path>) -> Vec<GameRecord> {
        match self.try_scan(platform, root) {
            Ok(games) => games,
            Err(e) => {
                info!("Skipping {}: {}", platform, e);
                Vec::new()
            }
        }
    }

    /// Scans `root` for media of `platform`, reporting why nothing could be
    /// scanned.
    ///
    /// Records come back in filesystem enumeration order. Newly computed
    /// titles are written to the title cache once at the end of the scan; a
    /// failed write is logged and does not fail the scan.
    pub fn try_scan(
        &self,
        platform: PlatformId,
        root: Option<&Path>,
    ) -> Result<Vec<GameRecord>, LibraryError> {
        let descriptor = resolve(platform)?;

        let root = match root {
            Some(root) if !root.as_os_str().is_empty() => root,
            _ => return Err(LibraryError::ConfigurationMissing(platform)),
        };
        if !root.is_dir() {
            return Err(LibraryError::RootNotFound {
                platform,
                path: root.to_path_buf(),
            });
        }
        // Records carry absolute media paths whatever the configured root.
        let root = std::path::absolute(root).map_err(|source| LibraryError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut games = Vec::new();
        let mut new_titles = 0usize;

        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_media(descriptor, entry.path()) {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };

            let title = match self.titles.get(file_name) {
                Some(title) => title,
                None => {
                    let title = normalize_title(file_name);
                    self.titles.stage(file_name, &title);
                    new_titles += 1;
                    title
                }
            };

            games.push(GameRecord {
                title,
                cover: self.cover_for(file_name),
                media_path: entry.into_path(),
                platform,
            });
        }

        if new_titles > 0 {
            debug!(count = new_titles, "Caching new titles");
            if let Err(e) = self.titles.save() {
                warn!("Failed to save title cache: {}", e);
            }
        }

        info!(
            "Scanned {} games for {} in {}",
            games.len(),
            descriptor.name,
            root.display()
        );
        Ok(games)
    }

    /// Custom cover if one is mapped and the image is still on disk.
    fn cover_for(&self, file_name: &str) -> Cover {
        if let Some(image) = self.images.get(file_name) {
            let path = self.images_dir.join(&image);
            if path.is_file() {
                return Cover::Custom(path);
            }
            debug!("Mapped cover for {} is missing: {}", file_name, path.display());
        }
        Cover::Placeholder
    }
}

fn is_media(descriptor: &PlatformDescriptor, path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| descriptor.accepts_extension(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LibraryScanner, LibraryStores) {
        let data = TempDir::new().unwrap();
        let stores = LibraryStores::open_in(data.path());
        let scanner = LibraryScanner::new(&stores);
        (data, scanner, stores)
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    fn sorted_titles(games: &[GameRecord]) -> Vec<String> {
        let mut titles: Vec<String> = games.iter().map(|g| g.title.clone()).collect();
        titles.sort();
        titles
    }

    #[test]
    fn test_unset_root_is_configuration_missing() {
        let (_data, scanner, _stores) = setup();
        assert!(matches!(
            scanner.try_scan(PlatformId::Psx, None),
            Err(LibraryError::ConfigurationMissing(PlatformId::Psx))
        ));
        assert!(matches!(
            scanner.try_scan(PlatformId::Psx, Some(Path::new(""))),
            Err(LibraryError::ConfigurationMissing(PlatformId::Psx))
        ));
        assert!(scanner.scan(PlatformId::Psx, None).is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let (data, scanner, _stores) = setup();
        let root = data.path().join("nope");
        assert!(matches!(
            scanner.try_scan(PlatformId::Saturn, Some(&root)),
            Err(LibraryError::RootNotFound { .. })
        ));
        assert!(scanner.scan(PlatformId::Saturn, Some(&root)).is_empty());
    }

    #[test]
    fn test_empty_root() {
        let (_data, scanner, stores) = setup();
        let roms = TempDir::new().unwrap();
        assert!(scanner.scan(PlatformId::SegaCd, Some(roms.path())).is_empty());
        assert!(!stores.titles.path().exists());
    }

    #[test]
    fn test_recursive_scan_filters_extensions() {
        let (_data, scanner, _stores) = setup();
        let roms = TempDir::new().unwrap();
        touch(&roms.path().join("Snatcher_(USA).cue"));
        touch(&roms.path().join("Snatcher_(USA)_Track01.bin"));
        touch(&roms.path().join("rpg/Lunar_(USA).CUE"));
        touch(&roms.path().join("rpg/deep/Popful_Mail.chd"));
        touch(&roms.path().join("notes.txt"));
        std::fs::create_dir_all(roms.path().join("folder.cue")).unwrap();

        let games = scanner.scan(PlatformId::SegaCd, Some(roms.path()));
        assert_eq!(sorted_titles(&games), vec!["Lunar", "Popful Mail", "Snatcher"]);
        for game in &games {
            assert_eq!(game.platform, PlatformId::SegaCd);
            assert!(game.media_path.is_file());
            assert!(game.cover.is_placeholder());
        }
    }

    #[test]
    fn test_new_titles_are_cached() {
        let (data, scanner, _stores) = setup();
        let roms = TempDir::new().unwrap();
        touch(&roms.path().join("Lunar_(USA).cue"));

        scanner.scan(PlatformId::SegaCd, Some(roms.path()));

        let reloaded = TitleCacheStore::open_in(data.path());
        assert_eq!(reloaded.get("Lunar_(USA).cue").as_deref(), Some("Lunar"));
    }

    #[test]
    fn test_cached_title_wins() {
        let (_data, scanner, stores) = setup();
        stores.titles.set("Lunar_(USA).cue", "Lunar: The Silver Star").unwrap();
        let roms = TempDir::new().unwrap();
        touch(&roms.path().join("Lunar_(USA).cue"));

        let games = scanner.scan(PlatformId::SegaCd, Some(roms.path()));
        assert_eq!(games[0].title, "Lunar: The Silver Star");
    }

    #[test]
    fn test_cache_not_rewritten_when_all_hits() {
        let (_data, scanner, stores) = setup();
        let roms = TempDir::new().unwrap();
        touch(&roms.path().join("Lunar.cue"));
        scanner.scan(PlatformId::SegaCd, Some(roms.path()));

        // Overwrite the document behind the store's back; a scan with only
        // cache hits must leave it alone.
        std::fs::write(stores.titles.path(), "{}").unwrap();
        scanner.scan(PlatformId::SegaCd, Some(roms.path()));
        assert_eq!(std::fs::read_to_string(stores.titles.path()).unwrap(), "{}");
    }

    #[test]
    fn test_custom_cover_requires_existing_image() {
        let (_data, scanner, stores) = setup();
        let roms = TempDir::new().unwrap();
        touch(&roms.path().join("Lunar.cue"));
        stores.images.set("Lunar.cue", "Lunar.png").unwrap();

        let games = scanner.scan(PlatformId::SegaCd, Some(roms.path()));
        assert_eq!(games[0].cover, Cover::Placeholder);

        touch(&stores.images_dir.join("Lunar.png"));
        let games = scanner.scan(PlatformId::SegaCd, Some(roms.path()));
        assert_eq!(
            games[0].cover,
            Cover::Custom(stores.images_dir.join("Lunar.png"))
        );
    }

    #[test]
    fn test_cache_write_failure_still_returns_records() {
        let data = TempDir::new().unwrap();
        let blocker = data.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let stores = LibraryStores {
            titles: Arc::new(TitleCacheStore::open_in(&blocker)),
            images: Arc::new(ImageMapStore::open_in(data.path())),
            images_dir: data.path().join("images"),
        };
        let scanner = LibraryScanner::new(&stores);
        let roms = TempDir::new().unwrap();
        touch(&roms.path().join("Lunar.cue"));

        let games = scanner.scan(PlatformId::SegaCd, Some(roms.path()));
        assert_eq!(games.len(), 1);
        assert_eq!(stores.titles.get("Lunar.cue").as_deref(), Some("Lunar"));
    }

    #[test]
    fn test_relative_root_yields_absolute_media_paths() {
        let (_data, scanner, _stores) = setup();
        // Created under the working directory so the root can be relative.
        let roms = TempDir::new_in(".").unwrap();
        touch(&roms.path().join("Lunar_(USA).cue"));
        let relative = roms
            .path()
            .strip_prefix(std::env::current_dir().unwrap())
            .unwrap_or(roms.path());
        assert!(relative.is_relative());

        let games = scanner.scan(PlatformId::SegaCd, Some(relative));
        assert_eq!(games.len(), 1);
        assert!(games[0].media_path.is_absolute());
        assert!(games[0].media_path.is_file());
        assert_eq!(
            games[0].media_path,
            std::path::absolute(relative.join("Lunar_(USA).cue")).unwrap()
        );
    }
}
