//! MegaDeck Core - game library aggregation
//!
//! This crate owns everything between the configured ROM directories and a
//! list of playable games. It has no UI or process-launching code.
//!
//! # Architecture
//!
//! - [`library::normalize_title`] - raw ROM file name to display title
//! - [`library::TitleCacheStore`] / [`library::ImageMapStore`] - persisted
//!   file name keyed mappings
//! - [`library::LibraryScanner`] - walks one platform root and builds records
//! - [`library::LibraryIndex`] - per-platform results, filtering and search
//! - [`app::config`] - TOML configuration and platform directories

pub mod app;
pub mod library;

pub use library::{
    CoverAssigner, DataDirProvider, ImageMapStore, LibraryError, LibraryIndex, LibraryScanner,
    LibraryStores, TitleCacheStore, normalize_title,
};
