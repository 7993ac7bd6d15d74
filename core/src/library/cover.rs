//! Custom cover art assignment
//!
//! Images picked by the user are copied into the data directory's
//! `images/` folder so the library keeps working if the original file moves.
//! The copy is named after the ROM (`<rom stem>.<image ext>`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use megadeck_shared::is_safe_file_name;
use tracing::{info, warn};

use super::error::CoverError;
use super::store::{ImageMapStore, LibraryStores};

/// Assigns and removes custom cover images.
#[derive(Debug, Clone)]
pub struct CoverAssigner {
    images: Arc<ImageMapStore>,
    images_dir: PathBuf,
}

impl CoverAssigner {
    pub fn new(stores: &LibraryStores) -> Self {
        Self {
            images: Arc::clone(&stores.images),
            images_dir: stores.images_dir.clone(),
        }
    }

    /// Copies `source` into the images directory and maps `rom_file_name`
    /// to the copy. Returns the path of the copy.
    ///
    /// An earlier cover with a different extension is deleted.
    pub fn assign(&self, rom_file_name: &str, source: &Path) -> Result<PathBuf, CoverError> {
        if !is_safe_file_name(rom_file_name) {
            return Err(CoverError::InvalidFileName(rom_file_name.to_string()));
        }
        if !source.is_file() {
            return Err(CoverError::SourceMissing(source.to_path_buf()));
        }

        let image_name = image_file_name(rom_file_name, source);
        let dest = self.images_dir.join(&image_name);

        std::fs::create_dir_all(&self.images_dir).map_err(|e| CoverError::Copy {
            path: self.images_dir.clone(),
            source: e,
        })?;
        if !same_file(source, &dest) {
            std::fs::copy(source, &dest).map_err(|e| CoverError::Copy {
                path: dest.clone(),
                source: e,
            })?;
        }

        let previous = self.images.get(rom_file_name);
        self.images.set(rom_file_name, &image_name)?;

        if let Some(previous) = previous
            && previous != image_name
        {
            self.delete_image(&previous);
        }

        info!("Assigned cover {} to {}", dest.display(), rom_file_name);
        Ok(dest)
    }

    /// Drops the cover mapping of `rom_file_name` and deletes the copied image.
    ///
    /// Returns whether a mapping existed.
    pub fn remove(&self, rom_file_name: &str) -> Result<bool, CoverError> {
        let Some(image_name) = self.images.get(rom_file_name) else {
            return Ok(false);
        };

        self.images.remove(rom_file_name)?;
        self.delete_image(&image_name);
        info!("Removed cover of {}", rom_file_name);
        Ok(true)
    }

    /// Mapped image path for a ROM, whether or not the file still exists.
    pub fn image_path(&self, rom_file_name: &str) -> Option<PathBuf> {
        self.images
            .get(rom_file_name)
            .map(|name| self.images_dir.join(name))
    }

    fn delete_image(&self, image_name: &str) {
        // Only files we copied ourselves are ever deleted.
        if !is_safe_file_name(image_name) {
            return;
        }
        let path = self.images_dir.join(image_name);
        if path.is_file()
            && let Err(e) = std::fs::remove_file(&path)
        {
            warn!("Failed to delete cover image {}: {}", path.display(), e);
        }
    }
}

/// `<rom stem>.<source extension>`, or just the stem if the source has none.
fn image_file_name(rom_file_name: &str, source: &Path) -> String {
    let stem = Path::new(rom_file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(rom_file_name);

    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", stem, ext.to_lowercase()),
        None => stem.to_string(),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
