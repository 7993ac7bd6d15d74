//! Platform catalog for the supported disc-based systems.
//!
//! `PLATFORMS` is the single source of truth for everything that differs
//! between systems: the configuration key holding the ROM root directory,
//! the recognized media extensions and the libretro core used to run them.
//! Adding a platform means adding a `PlatformId` variant and a descriptor
//! here; scanning and launching code never branches on a specific system.
//!
//! # Example
//!
//! ```
//! use megadeck_shared::{PlatformId, resolve};
//!
//! let psx = resolve(PlatformId::Psx).unwrap();
//! assert_eq!(psx.config_key, "psx");
//! assert!(psx.accepts_extension("CHD"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Extensions accepted for every disc-based platform: a cue sheet and a
/// compressed hunks-of-data image.
const DISC_EXTENSIONS: &[&str] = &["cue", "chd"];

/// Identifier of an emulated system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    /// Sega CD / Mega-CD
    #[serde(rename = "segacd")]
    SegaCd,
    /// Sega Saturn
    Saturn,
    /// Sony PlayStation
    Psx,
    /// NEC PC-FX
    #[serde(rename = "pcfx")]
    PcFx,
    /// NEC PC Engine CD / TurboGrafx-CD
    #[serde(rename = "pcecd")]
    PcEngineCd,
}

impl PlatformId {
    /// All platform identifiers in catalog order.
    pub const ALL: [PlatformId; 5] = [
        PlatformId::SegaCd,
        PlatformId::Saturn,
        PlatformId::Psx,
        PlatformId::PcFx,
        PlatformId::PcEngineCd,
    ];

    /// Stable string identifier, identical to the descriptor's configuration key.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::SegaCd => "segacd",
            PlatformId::Saturn => "saturn",
            PlatformId::Psx => "psx",
            PlatformId::PcFx => "pcfx",
            PlatformId::PcEngineCd => "pcecd",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = PlatformError;

    /// Parses a configuration key (`"psx"`) or a display name (`"PlayStation"`),
    /// ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PLATFORMS
            .iter()
            .find(|d| {
                d.config_key.eq_ignore_ascii_case(needle) || d.name.eq_ignore_ascii_case(needle)
            })
            .map(|d| d.id)
            .ok_or_else(|| PlatformError::UnknownPlatform(s.to_string()))
    }
}

/// Errors raised by catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("unknown platform '{0}' (supported: {list})", list = supported_platform_list())]
    UnknownPlatform(String),
}

/// Static description of one supported system.
#[derive(Debug, Clone, Copy)]
pub struct PlatformDescriptor {
    /// Platform identifier
    pub id: PlatformId,
    /// Human readable name (e.g., "Sega Saturn")
    pub name: &'static str,
    /// Key under `[roms]` in the configuration file holding the root directory
    pub config_key: &'static str,
    /// Recognized media file extensions, lowercase, without the dot
    pub extensions: &'static [&'static str],
    /// libretro core base name, without the platform library suffix
    pub core: &'static str,
}

impl PlatformDescriptor {
    /// Returns true if `ext` (without the dot) is a media extension of this platform.
    ///
    /// Matching ignores ASCII case so `GAME.CUE` rips are picked up too.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// File name of the core library on the current OS
    /// (e.g., `mednafen_psx_hw_libretro.so`).
    pub fn core_file_name(&self) -> String {
        format!("{}.{}", self.core, std::env::consts::DLL_EXTENSION)
    }
}

/// The platform catalog, in display order.
pub static PLATFORMS: [PlatformDescriptor; 5] = [
    PlatformDescriptor {
        id: PlatformId::SegaCd,
        name: "Sega CD",
        config_key: "segacd",
        extensions: DISC_EXTENSIONS,
        core: "genesis_plus_gx_libretro",
    },
    PlatformDescriptor {
        id: PlatformId::Saturn,
        name: "Sega Saturn",
        config_key: "saturn",
        extensions: DISC_EXTENSIONS,
        core: "mednafen_saturn_libretro",
    },
    PlatformDescriptor {
        id: PlatformId::Psx,
        name: "PlayStation",
        config_key: "psx",
        extensions: DISC_EXTENSIONS,
        core: "mednafen_psx_hw_libretro",
    },
    PlatformDescriptor {
        id: PlatformId::PcFx,
        name: "PC-FX",
        config_key: "pcfx",
        extensions: DISC_EXTENSIONS,
        core: "mednafen_pcfx_libretro",
    },
    PlatformDescriptor {
        id: PlatformId::PcEngineCd,
        name: "PC Engine CD",
        config_key: "pcecd",
        extensions: DISC_EXTENSIONS,
        core: "mednafen_pce_libretro",
    },
];

/// Returns all platform descriptors in catalog order.
pub fn descriptors() -> &'static [PlatformDescriptor] {
    &PLATFORMS
}

/// Looks up the descriptor for a platform.
pub fn resolve(id: PlatformId) -> Result<&'static PlatformDescriptor, PlatformError> {
    PLATFORMS
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| PlatformError::UnknownPlatform(id.as_str().to_string()))
}

/// Returns the first platform accepting the given extension.
///
/// Several platforms share the same disc formats, so this is only useful to
/// decide whether a file is a playable image at all.
pub fn descriptor_by_extension(ext: &str) -> Option<&'static PlatformDescriptor> {
    PLATFORMS.iter().find(|d| d.accepts_extension(ext))
}

/// Formatted list of every recognized extension for user-facing messages.
pub fn supported_extension_list() -> String {
    let mut exts: Vec<&str> = PLATFORMS
        .iter()
        .flat_map(|d| d.extensions.iter().copied())
        .collect();
    exts.sort_unstable();
    exts.dedup();
    exts.iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}

fn supported_platform_list() -> String {
    PLATFORMS
        .iter()
        .map(|d| d.config_key)
        .collect::<Vec<_>>()
        .join(", ")
}
