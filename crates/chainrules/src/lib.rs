//! # Chainrules
//!
//! The unified API for hard-fork scheduling: which protocol rules apply at
//! a block, and whether a node may switch from one fork schedule to another.
//!
//! ## Overview
//!
//! - **Configs**: fork thresholds, chain id and consensus engine, loaded
//!   from JSON or taken from a named network preset
//! - **Rules**: every activation flag evaluated at one height
//! - **Compatibility**: the lowest conflict between a stored and a candidate
//!   config, with the height to rewind to
//! - **Startup**: turning a conflict into accept, rewind or refuse
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chainrules::{decide, load_config_file, Network, StartupDecision, StartupPolicy};
//!
//! fn example() -> chainrules::Result<()> {
//!     let stored = Network::Mainnet.config();
//!     let candidate = load_config_file("genesis.json")?;
//!
//!     let policy = StartupPolicy { allow_rewind: true };
//!     match decide(stored, &candidate, 7_000_000u64, policy) {
//!         StartupDecision::Accept => {}
//!         StartupDecision::Rewind { to, .. } => println!("rewind to {to}"),
//!         StartupDecision::Refuse(err) => return Err(err.into()),
//!     }
//!
//!     let rules = candidate.rules(&7_000_001u64.into());
//!     assert!(rules.is_byzantium);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `chainrules::core` - Core primitives (ChainConfig, Rules, etc.)

pub mod error;
pub mod loader;
pub mod network;
pub mod startup;

// Re-export component crates
pub use chainrules_core as core;

// Re-export main types for convenience
pub use error::{ChainRulesError, Result};
pub use loader::{load_config_file, load_config_json};
pub use network::Network;
pub use startup::{decide, StartupDecision, StartupPolicy};

// Re-export commonly used core types
pub use chainrules_core::{
    check_compatible, is_active, BlockNumber, ChainConfig, ChainId, CliqueConfig,
    ConfigCompatError, Engine, Fork, Hash32, Rules,
};
