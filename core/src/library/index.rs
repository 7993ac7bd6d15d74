//! In-memory game library
//!
//! Holds the latest scan result of every platform. Each refresh replaces a
//! platform's list wholesale; nothing is merged.

use std::path::PathBuf;

use hashbrown::HashMap;
use megadeck_shared::{GameRecord, PlatformId, descriptors};
use tracing::info;

use super::scanner::LibraryScanner;

/// Configured ROM root directory per platform.
pub type PlatformRoots = HashMap<PlatformId, PathBuf>;

/// Per-platform scan results.
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    games: HashMap<PlatformId, Vec<GameRecord>>,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans every catalog platform once and replaces its results.
    ///
    /// Platforms without a usable root end up with an empty list.
    pub fn refresh_all(&mut self, scanner: &LibraryScanner, roots: &PlatformRoots) {
        for descriptor in descriptors() {
            let root = roots.get(&descriptor.id).map(PathBuf::as_path);
            let games = scanner.scan(descriptor.id, root);
            self.replace(descriptor.id, games);
        }
        info!("Library refreshed: {} games", self.len());
    }

    /// Replaces the results of one platform.
    pub fn replace(&mut self, platform: PlatformId, games: Vec<GameRecord>) {
        self.games.insert(platform, games);
    }

    /// Games of one platform, in scan order.
    pub fn by_platform(&self, platform: PlatformId) -> &[GameRecord] {
        self.games.get(&platform).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Games of the selected platforms, concatenated in catalog order.
    ///
    /// An empty selection means the whole library.
    pub fn filter(&self, platforms: &[PlatformId]) -> Vec<GameRecord> {
        descriptors()
            .iter()
            .filter(|d| platforms.is_empty() || platforms.contains(&d.id))
            .flat_map(|d| self.by_platform(d.id).iter().cloned())
            .collect()
    }

    /// Every game, in catalog order.
    pub fn all(&self) -> Vec<GameRecord> {
        self.filter(&[])
    }

    pub fn len(&self) -> usize {
        self.games.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Case-insensitive substring search over the titles of `view`.
    ///
    /// Searching never widens the view: a query only narrows what the
    /// current platform selection already shows. A blank query returns the
    /// view unchanged.
    pub fn search(view: &[GameRecord], query: &str) -> Vec<GameRecord> {
        let query = query.trim();
        if query.is_empty() {
            return view.to_vec();
        }

        let needle = query.to_lowercase();
        view.iter()
            .filter(|game| game.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Sorts games by title, ignoring case, for display.
    pub fn sorted_by_title(mut games: Vec<GameRecord>) -> Vec<GameRecord> {
        games.sort_by_cached_key(|game| game.title.to_lowercase());
        games
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::LibraryStores;
    use megadeck_shared::Cover;
    use tempfile::TempDir;

    fn game(title: &str, platform: PlatformId) -> GameRecord {
        GameRecord {
            title: title.to_string(),
            cover: Cover::Placeholder,
            media_path: PathBuf::from(format!("/roms/{}.cue", title)),
            platform,
        }
    }

    fn sample() -> LibraryIndex {
        let mut index = LibraryIndex::new();
        index.replace(
            PlatformId::Psx,
            vec![game("Vagrant Story", PlatformId::Psx), game("Xenogears", PlatformId::Psx)],
        );
        index.replace(PlatformId::SegaCd, vec![game("Lunar", PlatformId::SegaCd)]);
        index.replace(
            PlatformId::Saturn,
            vec![game("Panzer Dragoon Saga", PlatformId::Saturn)],
        );
        index
    }

    fn titles(games: &[GameRecord]) -> Vec<&str> {
        games.iter().map(|g| g.title.as_str()).collect()
    }

    #[test]
    fn test_by_platform() {
        let index = sample();
        assert_eq!(titles(index.by_platform(PlatformId::Psx)), vec!["Vagrant Story", "Xenogears"]);
        assert!(index.by_platform(PlatformId::PcFx).is_empty());
    }

    #[test]
    fn test_filter_uses_catalog_order() {
        let index = sample();
        let view = index.filter(&[PlatformId::Psx, PlatformId::SegaCd]);
        assert_eq!(titles(&view), vec!["Lunar", "Vagrant Story", "Xenogears"]);
    }

    #[test]
    fn test_empty_filter_is_everything() {
        let index = sample();
        assert_eq!(index.all().len(), 4);
        assert_eq!(index.filter(&[]).len(), index.len());
    }

    #[test]
    fn test_search_within_view_only() {
        let index = sample();
        let view = index.filter(&[PlatformId::Psx]);
        let found = LibraryIndex::search(&view, "DRAGOON");
        assert!(found.is_empty());

        let found = LibraryIndex::search(&index.all(), "DRAGOON");
        assert_eq!(titles(&found), vec!["Panzer Dragoon Saga"]);
    }

    #[test]
    fn test_search_empty_query_returns_view() {
        let index = sample();
        let view = index.filter(&[PlatformId::Psx]);
        assert_eq!(LibraryIndex::search(&view, ""), view);
        assert_eq!(LibraryIndex::search(&view, "   "), view);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut index = sample();
        index.replace(PlatformId::Psx, vec![]);
        assert!(index.by_platform(PlatformId::Psx).is_empty());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_sorted_by_title() {
        let sorted = LibraryIndex::sorted_by_title(vec![
            game("xenogears", PlatformId::Psx),
            game("Lunar", PlatformId::SegaCd),
            game("Vagrant Story", PlatformId::Psx),
        ]);
        assert_eq!(titles(&sorted), vec!["Lunar", "Vagrant Story", "xenogears"]);
    }

    #[test]
    fn test_refresh_all_replaces_and_clears() {
        let data = TempDir::new().unwrap();
        let roms = TempDir::new().unwrap();
        std::fs::write(roms.path().join("Xenogears_(Disc_1).chd"), b"").unwrap();
        let scanner = LibraryScanner::new(&LibraryStores::open_in(data.path()));

        let mut index = sample();
        let mut roots = PlatformRoots::new();
        roots.insert(PlatformId::Psx, roms.path().to_path_buf());
        index.refresh_all(&scanner, &roots);

        assert_eq!(titles(index.by_platform(PlatformId::Psx)), vec!["Xenogears"]);
        assert!(index.by_platform(PlatformId::SegaCd).is_empty());
        assert_eq!(index.len(), 1);
    }
}
