//! Launch resolution: game record to emulator command line.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use megadeck_core::app::EmulatorConfig;
use megadeck_shared::{GameRecord, PlatformError, PlatformId, resolve};
use tracing::info;

use super::emulator::execute;
use super::helpers::{absolute_path, core_path, emulator_args};

/// Why a game could not be launched.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("invalid game data: {0}")]
    InvalidGameData(String),

    #[error(transparent)]
    UnknownPlatform(#[from] PlatformError),

    #[error("core for {platform} not found: {}", path.display())]
    CoreNotFound { platform: PlatformId, path: PathBuf },

    #[error("emulator not found: {}", .0.display())]
    EmulatorNotFound(PathBuf),

    #[error("game file not found: {}", .0.display())]
    MediaNotFound(PathBuf),

    #[error("failed to start {}: {source}", executable.display())]
    ProcessLaunch {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("launch task did not complete: {0}")]
    Interrupted(String),
}

/// Everything needed to start the emulator for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub executable: PathBuf,
    pub arguments: Vec<OsString>,
    /// Directory the emulator runs in (the executable's directory)
    pub working_dir: PathBuf,
}

/// Resolves games against the configured emulator.
#[derive(Debug, Clone)]
pub struct LaunchResolver {
    emulator: EmulatorConfig,
}

impl LaunchResolver {
    pub fn new(emulator: EmulatorConfig) -> Self {
        Self { emulator }
    }

    /// Builds the launch plan for a game.
    ///
    /// Checks run in a fixed order so the first missing piece is the one
    /// reported: game data, core, emulator executable, then the media file.
    /// Nothing is spawned.
    pub fn resolve(&self, game: &GameRecord) -> Result<LaunchPlan, LaunchError> {
        if game.media_path.as_os_str().is_empty() {
            return Err(LaunchError::InvalidGameData(format!(
                "'{}' has no media path",
                game.title
            )));
        }

        let descriptor = resolve(game.platform)?;
        let core = absolute_path(&match self.emulator.cores_dir() {
            Some(dir) => core_path(&dir, descriptor),
            None => PathBuf::from(descriptor.core_file_name()),
        });
        if !core.is_file() {
            return Err(LaunchError::CoreNotFound {
                platform: game.platform,
                path: core,
            });
        }

        let executable = match self.emulator.executable().map(absolute_path) {
            Some(exe) if exe.is_file() => exe,
            other => return Err(LaunchError::EmulatorNotFound(other.unwrap_or_default())),
        };

        let media = absolute_path(&game.media_path);
        if !media.is_file() {
            return Err(LaunchError::MediaNotFound(game.media_path.clone()));
        }

        let working_dir = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let config_file = self
            .emulator
            .config_file()
            .map(|file| absolute_path(&file))
            .unwrap_or_default();

        Ok(LaunchPlan {
            arguments: emulator_args(&config_file, &core, &media),
            executable,
            working_dir,
        })
    }

    /// Resolves and starts a game without waiting for the emulator to exit.
    pub fn launch(&self, game: &GameRecord) -> Result<LaunchPlan, LaunchError> {
        let plan = self.resolve(game)?;
        execute(&plan)?;
        info!("Launched '{}' ({})", game.title, game.platform);
        Ok(plan)
    }
}
