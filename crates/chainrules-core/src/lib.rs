//! # Chainrules Core
//!
//! Pure primitives for hard-fork scheduling: the chain configuration, the
//! activation predicates over it, per-block rule snapshots, and the
//! compatibility check run when a stored configuration meets a new one.
//!
//! This crate contains no I/O. Everything here is pure computation over
//! configuration values.
//!
//! ## Key Types
//!
//! - [`ChainConfig`] - Fork thresholds, chain id and consensus engine
//! - [`Fork`] - One schedulable protocol change
//! - [`Rules`] - Every activation flag evaluated at one height
//! - [`ConfigCompatError`] - A conflict plus the height to rewind to
//!
//! ## Canonicalization
//!
//! Configurations have a deterministic CBOR encoding and a Blake3
//! fingerprint. See [`canonical`] module.

pub mod canonical;
pub mod compat;
pub mod config;
pub mod error;
pub mod forks;
pub mod presets;
pub mod rules;
pub mod types;

pub use canonical::{canonical_config_bytes, config_fingerprint, decode_config};
pub use compat::{check_compatible, check_compatible_at, is_fork_incompatible};
pub use config::{ChainConfig, CliqueConfig, Engine, EthashConfig};
pub use error::{ConfigCompatError, CoreError};
pub use forks::{is_active, Fork};
pub use presets::{
    TrustedCheckpoint, MAINNET_GENESIS_HASH, MAINNET_TRUSTED_CHECKPOINT, RINKEBY_GENESIS_HASH,
    RINKEBY_TRUSTED_CHECKPOINT, TESTNET_GENESIS_HASH, TESTNET_TRUSTED_CHECKPOINT,
};
pub use rules::Rules;
pub use types::{BlockNumber, ChainId, Hash32};
