//! Shared types for the MegaDeck game library.
//!
//! - [`PlatformId`] / [`PlatformDescriptor`] - the closed set of emulated
//!   systems and their static catalog entries
//! - [`GameRecord`] / [`Cover`] - one entry of a scanned library

pub mod file_name;
pub mod game;
pub mod platform;

pub use file_name::is_safe_file_name;
pub use game::{Cover, GameRecord, PLACEHOLDER_COVER};
pub use platform::{
    PLATFORMS, PlatformDescriptor, PlatformError, PlatformId, descriptor_by_extension,
    descriptors, resolve, supported_extension_list,
};
