//! Error types for library scanning and persistence.

use std::path::PathBuf;

use megadeck_shared::{PlatformError, PlatformId};

/// Errors produced while building the library.
///
/// None of these are fatal to the process: scans degrade to an empty result
/// and corrupt caches are reset.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("no ROM directory configured for {0}")]
    ConfigurationMissing(PlatformId),

    #[error("ROM directory for {platform} does not exist: {}", path.display())]
    RootNotFound { platform: PlatformId, path: PathBuf },

    #[error("cache file {} is corrupt: {source}", path.display())]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    UnknownPlatform(#[from] PlatformError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from writing a mapping store back to disk.
///
/// The in-memory mapping is already updated when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from assigning or removing custom cover art.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    #[error("image file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("invalid ROM file name '{0}'")]
    InvalidFileName(String),

    #[error("failed to copy image into {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
