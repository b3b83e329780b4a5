//! # Meshraid - extraction-raid mini-game core for mesh chat networks
//!
//! Meshraid is the transport-agnostic core of a persistent looting/PvP game:
//! players cycle Idle → Searching → Retreating, accumulate randomly-drawn
//! loot over wall-clock time, raid each other while exposed, and bank their
//! haul only when a retreat completes. A command layer (BBS door, chat bot,
//! CLI) turns user text into calls on [`raid::RaidGame`] and renders the
//! typed outcomes; this crate never produces user-facing strings.
//!
//! ## Features
//!
//! - **Lazy time resolution**: no schedulers or timers — extraction, retreat
//!   settlement, and combat gates are recomputed from stored timestamps
//!   whenever a player is touched, idempotently.
//! - **Equipment-driven stats**: every computation reads effective stats
//!   aggregated from the worn loadout at the point of use.
//! - **Two-stage weighted loot**: quality tier then item, with injectable,
//!   seedable randomness for deterministic tests.
//! - **PvP raids**: an ordered precondition ladder with typed rejections,
//!   probabilistic resolution, bag-only theft, cooldowns, and protection
//!   windows.
//! - **Write-through persistence**: sled-backed player records, committed to
//!   memory only after the store write succeeds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshraid::config::GameConfig;
//! use meshraid::raid::{Catalog, RaidGame, RaidStore};
//!
//! fn main() -> Result<(), meshraid::raid::RaidError> {
//!     let config = GameConfig::default();
//!     let store = RaidStore::open(config.store_dir())?;
//!     let catalog = Catalog::load_from_dir(config.seed_dir())?;
//!     let game = RaidGame::new(store, catalog, config)?;
//!
//!     game.start_search("player-1")?;
//!     let report = game.check_status("player-1")?;
//!     println!("bag {}/{}", report.bag_count, report.capacity);
//!     game.flush()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`raid`] - Data model, catalog, persistence, registry, and the game
//!   engines behind [`raid::RaidGame`]
//! - [`config`] - TOML-backed tuning configuration with validated defaults

pub mod config;
pub mod raid;
