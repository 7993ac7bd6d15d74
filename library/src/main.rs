//! MegaDeck launcher
//!
//! Lists, searches and launches disc-based games from the configured ROM
//! directories.
//!
//! # Commands
//!
//! - `megadeck` / `megadeck list` - List the library (optionally per platform)
//! - `megadeck search <QUERY>` - Case-insensitive title search
//! - `megadeck launch <GAME>` - Start a game in the emulator
//! - `megadeck platforms` - Show supported platforms and their ROM roots
//! - `megadeck cover set|remove` - Manage custom cover art
//! - `megadeck config show|set-root|set-emulator` - Edit `config.toml`
//!
//! Platforms are given by configuration key (`segacd`, `saturn`, `psx`,
//! `pcfx`, `pcecd`) or by name.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use megadeck_core::app::config::{self, AppDataDir, Config};
use megadeck_core::library::{ResolutionError, resolve_title};
use megadeck_core::{CoverAssigner, LibraryIndex, LibraryScanner, LibraryStores};
use megadeck_library::registry::LaunchResolver;
use megadeck_library::tasks::{self, LaunchStatus};
use megadeck_shared::{GameRecord, PlatformId, descriptors};
use tokio::sync::watch;

/// MegaDeck - disc-based game library and launcher
#[derive(Parser)]
#[command(name = "megadeck")]
#[command(about = "Disc-based game library and launcher")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List games (default)
    List(FilterArgs),

    /// Search game titles
    Search {
        /// Text to look for in titles (case-insensitive)
        query: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Launch a game in the emulator
    Launch {
        /// Game title, or a unique prefix of it
        game: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show supported platforms
    Platforms,

    /// Manage custom cover art
    #[command(subcommand)]
    Cover(CoverCommand),

    /// Show or edit the configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Only include these platforms (repeatable)
    #[arg(short, long = "platform")]
    platforms: Vec<PlatformId>,
}

#[derive(Subcommand)]
enum CoverCommand {
    /// Copy an image into the library and use it as a game's cover
    Set {
        /// Game title, or a unique prefix of it
        game: String,
        /// Image file to copy
        image: PathBuf,
    },
    /// Go back to the placeholder cover
    Remove {
        /// Game title, or a unique prefix of it
        game: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Set the ROM directory of a platform (empty to clear)
    SetRoot { platform: PlatformId, dir: PathBuf },
    /// Set the emulator executable
    SetEmulator { path: PathBuf },
}

/// Open the stores and scan every configured platform.
async fn load_library(config: &Config) -> Result<(LibraryStores, LibraryIndex)> {
    let stores =
        LibraryStores::open(&AppDataDir).context("Could not determine the data directory")?;
    let scanner = LibraryScanner::new(&stores);

    let mut index = LibraryIndex::new();
    tasks::refresh_library(scanner, config.roots())
        .await
        .apply(&mut index);

    Ok((stores, index))
}

fn print_games(games: &[GameRecord]) {
    for game in games {
        let cover = match game.cover.custom_path() {
            Some(_) => " [cover]",
            None => "",
        };
        println!("{:<48} {:<7}{}", game.title, game.platform.as_str(), cover);
    }
}

/// Print a resolution failure the way the user can act on it, then exit.
fn exit_unresolved(err: ResolutionError, games: &[GameRecord]) -> ! {
    eprintln!("{}", err.message);
    if let Some(suggestions) = err.suggestion {
        eprintln!("\nDid you mean:");
        for suggestion in suggestions {
            eprintln!("  - {}", suggestion);
        }
    } else if !games.is_empty() && games.len() <= 20 {
        eprintln!("\nAvailable games:");
        for game in games {
            eprintln!("  - {} [{}]", game.title, game.platform);
        }
    }
    std::process::exit(1);
}

fn find_game<'a>(query: &str, games: &'a [GameRecord]) -> &'a GameRecord {
    if games.is_empty() {
        eprintln!("No games found. Set a ROM directory with `megadeck config set-root`.");
        std::process::exit(1);
    }
    match resolve_title(query, games) {
        Ok(game) => game,
        Err(e) => exit_unresolved(e, games),
    }
}

async fn list(config: &Config, filter: FilterArgs) -> Result<()> {
    let (_stores, index) = load_library(config).await?;
    let games = LibraryIndex::sorted_by_title(index.filter(&filter.platforms));
    if games.is_empty() {
        println!("No games found. Set a ROM directory with `megadeck config set-root`.");
        return Ok(());
    }
    print_games(&games);
    println!("\n{} games", games.len());
    Ok(())
}

async fn search(config: &Config, query: &str, filter: FilterArgs) -> Result<()> {
    let (_stores, index) = load_library(config).await?;
    let view = index.filter(&filter.platforms);
    let found = LibraryIndex::sorted_by_title(LibraryIndex::search(&view, query));
    if found.is_empty() {
        println!("No games match '{}'", query);
    } else {
        print_games(&found);
    }
    Ok(())
}

async fn launch(config: &Config, query: &str, filter: FilterArgs) -> Result<()> {
    let (_stores, index) = load_library(config).await?;
    let view = index.filter(&filter.platforms);
    let game = find_game(query, &view).clone();

    tracing::info!("Launching '{}' ({})", game.title, game.platform);

    let resolver = Arc::new(LaunchResolver::new(config.emulator.clone()));
    let (status_tx, status_rx) = watch::channel(LaunchStatus::Idle);
    tasks::launch(resolver, game, &status_tx).await?;

    if let LaunchStatus::Launched(title) = &*status_rx.borrow() {
        println!("Started {}", title);
    }
    Ok(())
}

fn platforms(config: &Config) {
    for descriptor in descriptors() {
        let root = config
            .root(descriptor.id)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string());
        println!(
            "{:<7} {:<14} .{:<10} {:<26} {}",
            descriptor.config_key,
            descriptor.name,
            descriptor.extensions.join(" ."),
            descriptor.core,
            root
        );
    }
}

async fn cover(config: &Config, command: CoverCommand) -> Result<()> {
    let (stores, index) = load_library(config).await?;
    let games = index.all();
    let assigner = CoverAssigner::new(&stores);

    match command {
        CoverCommand::Set { game, image } => {
            let game = find_game(&game, &games);
            let file_name = game
                .file_name()
                .with_context(|| format!("'{}' has no usable file name", game.title))?;
            let copied = assigner.assign(file_name, &image)?;
            println!("Cover of {} set to {}", game.title, copied.display());
        }
        CoverCommand::Remove { game } => {
            let game = find_game(&game, &games);
            let file_name = game
                .file_name()
                .with_context(|| format!("'{}' has no usable file name", game.title))?;
            if assigner.remove(file_name)? {
                println!("Cover of {} removed", game.title);
            } else {
                println!("{} has no custom cover", game.title);
            }
        }
    }
    Ok(())
}

fn configure(mut config: Config, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if let Some(path) = config::config_path() {
                println!("config file: {}", path.display());
            }
            if let Some(dir) = config::data_dir() {
                println!("data dir:    {}", dir.display());
            }
            println!("\n[roms]");
            for descriptor in descriptors() {
                if let Some(root) = config.root(descriptor.id) {
                    println!("{} = {}", descriptor.config_key, root.display());
                }
            }
            println!("\n[emulator]");
            let emulator = &config.emulator;
            let show = |p: Option<PathBuf>| {
                p.map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            };
            println!(
                "executable  = {}",
                show(emulator.executable().map(|p| p.to_path_buf()))
            );
            println!("cores_dir   = {}", show(emulator.cores_dir()));
            println!("config_file = {}", show(emulator.config_file()));
            return Ok(());
        }
        ConfigCommand::SetRoot { platform, dir } => {
            if !dir.as_os_str().is_empty() && !dir.is_dir() {
                tracing::warn!("{} is not a directory (yet)", dir.display());
            }
            config.set_root(platform, dir);
        }
        ConfigCommand::SetEmulator { path } => {
            if !path.is_file() {
                tracing::warn!("{} does not exist (yet)", path.display());
            }
            config.emulator.executable = path;
        }
    }

    config::save(&config).context("Failed to save configuration")?;
    println!("Configuration saved");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load();

    match cli.command.unwrap_or(Commands::List(FilterArgs::default())) {
        Commands::List(filter) => list(&config, filter).await,
        Commands::Search { query, filter } => search(&config, &query, filter).await,
        Commands::Launch { game, filter } => launch(&config, &game, filter).await,
        Commands::Platforms => {
            platforms(&config);
            Ok(())
        }
        Commands::Cover(command) => cover(&config, command).await,
        Commands::Config(command) => configure(config, command),
    }
}
