//! MegaDeck Library
//!
//! Turns library entries into running emulator processes.
//!
//! Games are launched as separate emulator processes (RetroArch with a
//! libretro core per platform). This provides:
//! - Crash isolation (an emulator crash doesn't take the library down)
//! - No emulator code linked into the library
//! - New platforms only need a catalog entry and a core

pub mod registry;
pub mod tasks;
