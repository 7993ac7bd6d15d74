//! Configuration management (`config.toml`)
//!
//! Handles loading, saving, and providing defaults for application settings.
//! Settings are stored in TOML format in the platform-specific config directory.
//!
//! ```toml
//! [roms]
//! segacd = "/roms/segacd"
//! psx = "/roms/psx"
//!
//! [emulator]
//! executable = "/opt/retroarch/retroarch"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use megadeck_shared::{PlatformId, descriptors};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::library::{DataDirProvider, PlatformRoots};

/// File name of the configuration inside [`config_dir`].
pub const CONFIG_FILE: &str = "config.toml";

/// Name of the emulator's own configuration file, looked up next to the
/// executable when no explicit path is configured.
pub const EMULATOR_CONFIG_FILE: &str = "retroarch.cfg";

/// Name of the cores folder next to the emulator executable.
pub const CORES_DIR: &str = "cores";

/// Application configuration.
///
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// ROM root directory per platform, keyed by the platform's config key
    #[serde(default)]
    pub roms: BTreeMap<String, PathBuf>,
    /// Emulator used to launch every platform
    #[serde(default)]
    pub emulator: EmulatorConfig,
}

/// Emulator settings.
///
/// Empty paths count as unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmulatorConfig {
    /// Path to the emulator executable
    #[serde(default)]
    pub executable: PathBuf,
    /// Directory holding libretro cores (default: `<emulator dir>/cores`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores_dir: Option<PathBuf>,
    /// Emulator configuration file (default: `<emulator dir>/retroarch.cfg`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

fn non_empty(path: &Path) -> Option<&Path> {
    (!path.as_os_str().is_empty()).then_some(path)
}

impl EmulatorConfig {
    pub fn executable(&self) -> Option<&Path> {
        non_empty(&self.executable)
    }

    /// Directory containing the executable.
    pub fn emulator_dir(&self) -> Option<PathBuf> {
        self.executable()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
    }

    /// Effective cores directory.
    pub fn cores_dir(&self) -> Option<PathBuf> {
        match self.cores_dir.as_deref().and_then(non_empty) {
            Some(dir) => Some(dir.to_path_buf()),
            None => self.emulator_dir().map(|dir| dir.join(CORES_DIR)),
        }
    }

    /// Effective emulator configuration file.
    pub fn config_file(&self) -> Option<PathBuf> {
        match self.config_file.as_deref().and_then(non_empty) {
            Some(file) => Some(file.to_path_buf()),
            None => self.emulator_dir().map(|dir| dir.join(EMULATOR_CONFIG_FILE)),
        }
    }
}

impl Config {
    /// Configured ROM root of one platform, if set and non-empty.
    pub fn root(&self, platform: PlatformId) -> Option<&Path> {
        self.roms
            .get(platform.as_str())
            .and_then(|dir| non_empty(dir))
    }

    /// Sets (or with an empty path, clears) the ROM root of a platform.
    pub fn set_root(&mut self, platform: PlatformId, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            self.roms.remove(platform.as_str());
        } else {
            self.roms.insert(platform.as_str().to_string(), dir);
        }
    }

    /// Configured roots of every catalog platform.
    ///
    /// Keys under `[roms]` that name no platform are ignored with a warning.
    pub fn roots(&self) -> PlatformRoots {
        for key in self.roms.keys() {
            if !descriptors().iter().any(|d| d.config_key == key) {
                warn!("Ignoring unknown platform '{}' in [roms]", key);
            }
        }

        descriptors()
            .iter()
            .filter_map(|d| self.root(d.id).map(|dir| (d.id, dir.to_path_buf())))
            .collect()
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io.megadeck", "", "MegaDeck")
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\MegaDeck\config`
/// On macOS: `~/Library/Application Support/io.megadeck.MegaDeck`
/// On Linux: `~/.config/MegaDeck`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the platform-specific data directory.
///
/// On Windows: `%APPDATA%\MegaDeck\data`
/// On macOS: `~/Library/Application Support/io.megadeck.MegaDeck`
/// On Linux: `~/.local/share/MegaDeck`
///
/// This is where the title cache, the image map and cover images are stored.
/// Returns `None` if the home directory cannot be determined.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// [`DataDirProvider`] backed by [`data_dir`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AppDataDir;

impl DataDirProvider for AppDataDir {
    fn data_dir(&self) -> Option<PathBuf> {
        data_dir()
    }
}

/// Path of `config.toml`, if the config directory is known.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from disk.
///
/// Reads `config.toml` from the platform's configuration directory.
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    config_path().map(|path| load_from(&path)).unwrap_or_default()
}

/// Loads the configuration from an explicit path.
pub fn load_from(path: &Path) -> Config {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Invalid config at {}, using defaults: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Saves the configuration to disk.
///
/// Writes `config.toml` to the platform's configuration directory.
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(config: &Config) -> std::io::Result<()> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

/// Saves the configuration to an explicit path.
pub fn save_to(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}
