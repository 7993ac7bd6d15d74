//! Library entries produced by a directory scan.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform::PlatformId;

/// Reference shown when a game has no custom cover art.
pub const PLACEHOLDER_COVER: &str = "no_image.png";

/// Cover art of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cover {
    /// Absolute path to a user-assigned image
    Custom(PathBuf),
    /// No image assigned (or the assigned image is gone)
    #[default]
    Placeholder,
}

impl Cover {
    /// Path to the custom image, if any.
    pub fn custom_path(&self) -> Option<&Path> {
        match self {
            Cover::Custom(path) => Some(path),
            Cover::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cover::Placeholder)
    }
}

impl fmt::Display for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cover::Custom(path) => write!(f, "{}", path.display()),
            Cover::Placeholder => f.write_str(PLACEHOLDER_COVER),
        }
    }
}

/// One playable title in the library.
///
/// Records are rebuilt on every scan and never persisted. `media_path`
/// pointed at an existing file when the scan ran; the file may have been
/// removed since, which is checked again at launch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Normalized display title
    pub title: String,
    /// Custom cover art or the placeholder
    pub cover: Cover,
    /// Path to the primary playable file (cue sheet or compressed image)
    pub media_path: PathBuf,
    /// System the media belongs to
    pub platform: PlatformId,
}

impl GameRecord {
    /// Base file name of the media, used as the key of the title and image stores.
    pub fn file_name(&self) -> Option<&str> {
        self.media_path.file_name().and_then(|n| n.to_str())
    }
}
