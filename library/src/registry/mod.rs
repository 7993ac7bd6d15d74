//! Emulator launch resolution for every catalog platform
//!
//! # Architecture
//!
//! 1. `PlatformDescriptor` (from megadeck_shared) names the libretro core of a platform
//! 2. `LaunchResolver` validates a `GameRecord` and builds a `LaunchPlan`
//! 3. `execute()` spawns the emulator described by the plan and returns immediately
//!
//! # Adding a New Platform
//!
//! 1. Add a `PlatformId` variant in megadeck_shared
//! 2. Add its descriptor (extensions and core) to `PLATFORMS`
//! 3. Install the core next to the emulator
//!
//! Nothing in this module changes.

mod emulator;
mod helpers;
mod launcher;

pub use emulator::{build_command, execute};
pub use launcher::{LaunchError, LaunchPlan, LaunchResolver};
