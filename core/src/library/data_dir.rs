//! Data directory abstraction for the library's persisted state

use std::path::PathBuf;

/// Subdirectory of the data directory holding custom cover images.
pub const IMAGES_DIR: &str = "images";

/// Trait for providing the directory that holds the title cache, the image
/// map and the `images/` folder.
///
/// The binary uses [`crate::app::config::data_dir`]; tests point it at a
/// temporary directory.
///
/// # Example
///
/// ```rust
/// use megadeck_core::DataDirProvider;
/// use std::path::PathBuf;
///
/// struct FixedDataDir(PathBuf);
///
/// impl DataDirProvider for FixedDataDir {
///     fn data_dir(&self) -> Option<PathBuf> {
///         Some(self.0.clone())
///     }
/// }
///
/// let provider = FixedDataDir(PathBuf::from("/tmp/megadeck"));
/// assert_eq!(
///     provider.images_dir(),
///     Some(PathBuf::from("/tmp/megadeck/images"))
/// );
/// ```
pub trait DataDirProvider: Send + Sync {
    /// Returns the data directory path.
    ///
    /// Returns `None` if the home directory cannot be determined.
    fn data_dir(&self) -> Option<PathBuf>;

    /// Directory holding custom cover images.
    fn images_dir(&self) -> Option<PathBuf> {
        self.data_dir().map(|dir| dir.join(IMAGES_DIR))
    }
}

impl DataDirProvider for PathBuf {
    fn data_dir(&self) -> Option<PathBuf> {
        Some(self.clone())
    }
}
