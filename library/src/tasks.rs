//! Background work for interactive front ends.
//!
//! Scanning and spawning are blocking filesystem/process calls. These
//! wrappers move them onto tokio's blocking pool so a UI thread stays
//! responsive, and report launch progress through a watch channel.

use std::path::PathBuf;
use std::sync::Arc;

use megadeck_core::library::PlatformRoots;
use megadeck_core::{LibraryIndex, LibraryScanner};
use megadeck_shared::{GameRecord, PlatformId, descriptors};
use tokio::sync::watch;
use tracing::warn;

use crate::registry::{LaunchError, LaunchResolver};

/// Progress of the most recent launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LaunchStatus {
    #[default]
    Idle,
    Launching(String),
    /// The emulator process was started. Says nothing about when it exits.
    Launched(String),
    Failed(String),
}

/// Scan results of every catalog platform, ready to install in an index.
#[derive(Debug, Clone, Default)]
pub struct RefreshResult {
    pub platforms: Vec<(PlatformId, Vec<GameRecord>)>,
}

impl RefreshResult {
    /// Replaces each scanned platform's entries in `index`.
    pub fn apply(self, index: &mut LibraryIndex) {
        for (platform, games) in self.platforms {
            index.replace(platform, games);
        }
    }
}

/// Scans every platform on the blocking pool.
///
/// If the scan task panics the result is empty for every platform; the
/// panic is logged.
pub async fn refresh_library(scanner: LibraryScanner, roots: PlatformRoots) -> RefreshResult {
    let task = tokio::task::spawn_blocking(move || {
        let platforms = descriptors()
            .iter()
            .map(|d| {
                let root = roots.get(&d.id).map(PathBuf::as_path);
                (d.id, scanner.scan(d.id, root))
            })
            .collect();
        RefreshResult { platforms }
    });

    match task.await {
        Ok(result) => result,
        Err(e) => {
            warn!("Library refresh task failed: {}", e);
            RefreshResult::default()
        }
    }
}

/// Launches a game on the blocking pool, publishing progress on `status`.
///
/// `Launching` is sent before anything else happens; `Launched` or `Failed`
/// once the spawn call returns.
pub async fn launch(
    resolver: Arc<LaunchResolver>,
    game: GameRecord,
    status: &watch::Sender<LaunchStatus>,
) -> Result<(), LaunchError> {
    let title = game.title.clone();
    status.send_replace(LaunchStatus::Launching(title.clone()));

    let result = tokio::task::spawn_blocking(move || resolver.launch(&game).map(|_| ()))
        .await
        .unwrap_or_else(|e| Err(LaunchError::Interrupted(e.to_string())));

    match &result {
        Ok(()) => status.send_replace(LaunchStatus::Launched(title)),
        Err(e) => status.send_replace(LaunchStatus::Failed(e.to_string())),
    };
    result
}
