//! Game library management
//!
//! Directory scanning, title and cover persistence, and the in-memory index.

mod cover;
mod data_dir;
mod error;
mod index;
mod resolver;
mod scanner;
pub mod store;
mod title;

pub use cover::CoverAssigner;
pub use data_dir::{DataDirProvider, IMAGES_DIR};
pub use error::{CoverError, LibraryError, StoreError};
pub use index::{LibraryIndex, PlatformRoots};
pub use resolver::{ResolutionError, find_similar, levenshtein_distance, resolve_by, resolve_title};
pub use scanner::LibraryScanner;
pub use store::{ImageMapStore, LibraryStores, MapStore, TitleCacheStore};
pub use title::normalize_title;
