//! Path and argument helpers for launch plans.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use megadeck_shared::PlatformDescriptor;

/// Flag prefix pointing the emulator at its configuration file.
const CONFIG_FLAG: &str = "--config=";
/// Flag loading a libretro core.
const CORE_FLAG: &str = "-L";
/// Flag starting the emulator fullscreen.
const FULLSCREEN_FLAG: &str = "-f";

/// Location of a platform's core inside `cores_dir`.
pub(crate) fn core_path(cores_dir: &Path, descriptor: &PlatformDescriptor) -> PathBuf {
    cores_dir.join(descriptor.core_file_name())
}

/// `path` made absolute against the current directory.
///
/// The emulator runs in its own directory, so every path handed to it must
/// survive the change of working directory. Empty paths are returned as is.
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// `--config=<path>` as a single argument, keeping non UTF-8 paths intact.
pub(crate) fn config_arg(config_file: &Path) -> OsString {
    let mut arg = OsString::from(CONFIG_FLAG);
    arg.push(config_file.as_os_str());
    arg
}

/// Full argument vector: `--config=<cfg> -L <core> <media> -f`.
pub(crate) fn emulator_args(config_file: &Path, core: &Path, media: &Path) -> Vec<OsString> {
    vec![
        config_arg(config_file),
        OsString::from(CORE_FLAG),
        core.as_os_str().to_owned(),
        media.as_os_str().to_owned(),
        OsString::from(FULLSCREEN_FLAG),
    ]
}
