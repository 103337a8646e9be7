//! Named network selection.

use std::fmt;
use std::str::FromStr;

use chainrules_core::presets;
use chainrules_core::{ChainConfig, Hash32, TrustedCheckpoint};

use crate::error::ChainRulesError;

/// A built-in network preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    /// Ropsten.
    Testnet,
    Rinkeby,
    /// Every protocol change from genesis, ethash.
    AllEthash,
    /// Every protocol change from genesis, clique.
    AllClique,
    /// Test configuration with chain id 1.
    Test,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Rinkeby,
        Network::AllEthash,
        Network::AllClique,
        Network::Test,
    ];

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Rinkeby => "rinkeby",
            Network::AllEthash => "all-ethash",
            Network::AllClique => "all-clique",
            Network::Test => "test",
        }
    }

    /// The preset configuration.
    pub fn config(self) -> &'static ChainConfig {
        match self {
            Network::Mainnet => presets::mainnet(),
            Network::Testnet => presets::testnet(),
            Network::Rinkeby => presets::rinkeby(),
            Network::AllEthash => presets::all_ethash_protocol_changes(),
            Network::AllClique => presets::all_clique_protocol_changes(),
            Network::Test => presets::test_chain_config(),
        }
    }

    /// Genesis hash, known only for public networks.
    pub fn genesis_hash(self) -> Option<Hash32> {
        match self {
            Network::Mainnet => Some(presets::MAINNET_GENESIS_HASH),
            Network::Testnet => Some(presets::TESTNET_GENESIS_HASH),
            Network::Rinkeby => Some(presets::RINKEBY_GENESIS_HASH),
            _ => None,
        }
    }

    /// Light-client checkpoint, known only for public networks.
    pub fn trusted_checkpoint(self) -> Option<&'static TrustedCheckpoint> {
        match self {
            Network::Mainnet => Some(&presets::MAINNET_TRUSTED_CHECKPOINT),
            Network::Testnet => Some(&presets::TESTNET_TRUSTED_CHECKPOINT),
            Network::Rinkeby => Some(&presets::RINKEBY_TRUSTED_CHECKPOINT),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = ChainRulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" | "ropsten" => Ok(Network::Testnet),
            "rinkeby" => Ok(Network::Rinkeby),
            "all-ethash" => Ok(Network::AllEthash),
            "all-clique" => Ok(Network::AllClique),
            "test" => Ok(Network::Test),
            _ => Err(ChainRulesError::UnknownNetwork(s.to_string())),
        }
    }
}
