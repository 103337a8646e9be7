//! ChainConfig: the fork schedule and consensus engine of a network.
//!
//! A `ChainConfig` is built once (from a preset or a loaded document) and is
//! read-only afterwards. It is `Send + Sync`; share it behind an `Arc` or a
//! `&'static` reference across block-processing workers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::forks::Fork;
use crate::types::{BlockNumber, ChainId, Hash32};

/// Parameters of proof-of-authority (clique) sealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CliqueConfig {
    /// Number of seconds between blocks to enforce.
    pub period: u64,
    /// Epoch length to reset votes and checkpoint.
    pub epoch: u64,
}

/// Marker for proof-of-work (ethash) sealing. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthashConfig {}

/// The consensus engine selected by a configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Engine {
    /// No engine. Only valid for synthetic and test configurations.
    #[default]
    None,
    /// Proof-of-work sealing.
    ProofOfWork,
    /// Proof-of-authority sealing.
    ProofOfAuthority(CliqueConfig),
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::None => f.write_str("unknown"),
            Engine::ProofOfWork => f.write_str("ethash"),
            Engine::ProofOfAuthority(_) => f.write_str("clique"),
        }
    }
}

/// The core configuration that determines which protocol rules apply at
/// every height of a chain.
///
/// Thresholds are `None` when the fork never activates and `Some(0)` when it
/// is active from genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChainConfigRepr", into = "ChainConfigRepr")]
pub struct ChainConfig {
    /// Replay-protection chain identifier.
    pub chain_id: Option<ChainId>,

    pub homestead_block: Option<BlockNumber>,
    /// DELEGATECALL.
    pub eip7_block: Option<BlockNumber>,

    pub dao_fork_block: Option<BlockNumber>,
    /// Whether the node supports or opposes the DAO hard fork.
    pub dao_fork_support: bool,

    /// Gas repricing.
    pub eip150_block: Option<BlockNumber>,
    /// Hash of the EIP150 block, for header-only clients.
    pub eip150_hash: Hash32,
    pub eip155_block: Option<BlockNumber>,
    pub eip158_block: Option<BlockNumber>,

    pub byzantium_block: Option<BlockNumber>,
    /// Difficulty adjustment including uncles.
    pub eip100_block: Option<BlockNumber>,
    /// REVERT.
    pub eip140_block: Option<BlockNumber>,
    /// Big integer modexp precompile.
    pub eip198_block: Option<BlockNumber>,
    /// RETURNDATACOPY, RETURNDATASIZE.
    pub eip211_block: Option<BlockNumber>,
    /// Pairing check precompile.
    pub eip212_block: Option<BlockNumber>,
    /// alt_bn128 addition and scalar multiplication precompiles.
    pub eip213_block: Option<BlockNumber>,
    /// STATICCALL.
    pub eip214_block: Option<BlockNumber>,
    /// Difficulty bomb delay and block reward reduction; paired with EIP100.
    pub eip649_block: Option<BlockNumber>,
    /// Receipt status code.
    pub eip658_block: Option<BlockNumber>,

    pub constantinople_block: Option<BlockNumber>,
    /// SHL, SHR, SAR.
    pub eip145_block: Option<BlockNumber>,
    /// CREATE2.
    pub eip1014_block: Option<BlockNumber>,
    /// EXTCODEHASH.
    pub eip1052_block: Option<BlockNumber>,
    /// Difficulty bomb delay and block reward adjustment.
    pub eip1234_block: Option<BlockNumber>,
    /// Net gas metering for SSTORE.
    pub eip1283_block: Option<BlockNumber>,

    pub ewasm_block: Option<BlockNumber>,

    pub engine: Engine,
}

impl ChainConfig {
    /// Threshold of `fork` in this configuration.
    pub fn fork_block(&self, fork: Fork) -> Option<&BlockNumber> {
        self.fork_slot(fork).as_ref()
    }

    /// Replace the threshold of `fork`.
    ///
    /// Intended for building configurations; a config in use must not be
    /// mutated.
    pub fn set_fork_block(&mut self, fork: Fork, block: Option<BlockNumber>) {
        *self.fork_slot_mut(fork) = block;
    }

    /// Builder-style [`set_fork_block`](Self::set_fork_block).
    pub fn with_fork_block(mut self, fork: Fork, block: impl Into<BlockNumber>) -> Self {
        self.set_fork_block(fork, Some(block.into()));
        self
    }

    /// Thresholds of the nine Byzantium units.
    pub fn byzantium_eip_blocks(&self) -> [Option<&BlockNumber>; 9] {
        Fork::BYZANTIUM_EIPS.map(|fork| self.fork_block(fork))
    }

    /// Thresholds of the five Constantinople units.
    pub fn constantinople_eip_blocks(&self) -> [Option<&BlockNumber>; 5] {
        Fork::CONSTANTINOPLE_EIPS.map(|fork| self.fork_block(fork))
    }

    /// The clique parameters, if proof-of-authority is selected.
    pub fn clique(&self) -> Option<&CliqueConfig> {
        match &self.engine {
            Engine::ProofOfAuthority(clique) => Some(clique),
            _ => None,
        }
    }

    fn fork_slot(&self, fork: Fork) -> &Option<BlockNumber> {
        match fork {
            Fork::Homestead => &self.homestead_block,
            Fork::Eip7 => &self.eip7_block,
            Fork::Dao => &self.dao_fork_block,
            Fork::Eip150 => &self.eip150_block,
            Fork::Eip155 => &self.eip155_block,
            Fork::Eip158 => &self.eip158_block,
            Fork::Byzantium => &self.byzantium_block,
            Fork::Eip100 => &self.eip100_block,
            Fork::Eip140 => &self.eip140_block,
            Fork::Eip198 => &self.eip198_block,
            Fork::Eip211 => &self.eip211_block,
            Fork::Eip212 => &self.eip212_block,
            Fork::Eip213 => &self.eip213_block,
            Fork::Eip214 => &self.eip214_block,
            Fork::Eip649 => &self.eip649_block,
            Fork::Eip658 => &self.eip658_block,
            Fork::Constantinople => &self.constantinople_block,
            Fork::Eip145 => &self.eip145_block,
            Fork::Eip1014 => &self.eip1014_block,
            Fork::Eip1052 => &self.eip1052_block,
            Fork::Eip1234 => &self.eip1234_block,
            Fork::Eip1283 => &self.eip1283_block,
            Fork::Ewasm => &self.ewasm_block,
        }
    }

    fn fork_slot_mut(&mut self, fork: Fork) -> &mut Option<BlockNumber> {
        match fork {
            Fork::Homestead => &mut self.homestead_block,
            Fork::Eip7 => &mut self.eip7_block,
            Fork::Dao => &mut self.dao_fork_block,
            Fork::Eip150 => &mut self.eip150_block,
            Fork::Eip155 => &mut self.eip155_block,
            Fork::Eip158 => &mut self.eip158_block,
            Fork::Byzantium => &mut self.byzantium_block,
            Fork::Eip100 => &mut self.eip100_block,
            Fork::Eip140 => &mut self.eip140_block,
            Fork::Eip198 => &mut self.eip198_block,
            Fork::Eip211 => &mut self.eip211_block,
            Fork::Eip212 => &mut self.eip212_block,
            Fork::Eip213 => &mut self.eip213_block,
            Fork::Eip214 => &mut self.eip214_block,
            Fork::Eip649 => &mut self.eip649_block,
            Fork::Eip658 => &mut self.eip658_block,
            Fork::Constantinople => &mut self.constantinople_block,
            Fork::Eip145 => &mut self.eip145_block,
            Fork::Eip1014 => &mut self.eip1014_block,
            Fork::Eip1052 => &mut self.eip1052_block,
            Fork::Eip1234 => &mut self.eip1234_block,
            Fork::Eip1283 => &mut self.eip1283_block,
            Fork::Ewasm => &mut self.ewasm_block,
        }
    }
}

struct Nil<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Nil<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => fmt::Display::fmt(v, f),
            None => f.write_str("<nil>"),
        }
    }
}

impl fmt::Display for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ChainID: {} Homestead: {} DAO: {} DAOSupport: {} EIP150: {} EIP155: {} EIP158: {} Byzantium: {} Constantinople: {} Engine: {}}}",
            Nil(&self.chain_id),
            Nil(&self.homestead_block),
            Nil(&self.dao_fork_block),
            self.dao_fork_support,
            Nil(&self.eip150_block),
            Nil(&self.eip155_block),
            Nil(&self.eip158_block),
            Nil(&self.byzantium_block),
            Nil(&self.constantinople_block),
            self.engine,
        )
    }
}

/// Serialized shape of [`ChainConfig`].
///
/// Unset thresholds are omitted. The engine is carried by at most one of
/// `ethash` / `clique`; a document naming both is rejected.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainConfigRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain_id: Option<ChainId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    homestead_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip7_block: Option<BlockNumber>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    dao_fork_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "is_false")]
    dao_fork_support: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip150_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Hash32::is_zero")]
    eip150_hash: Hash32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip155_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip158_block: Option<BlockNumber>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    byzantium_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip100_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip140_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip198_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip211_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip212_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip213_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip214_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip649_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip658_block: Option<BlockNumber>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    constantinople_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip145_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip1014_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip1052_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip1234_block: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eip1283_block: Option<BlockNumber>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    ewasm_block: Option<BlockNumber>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    ethash: Option<EthashConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clique: Option<CliqueConfig>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TryFrom<ChainConfigRepr> for ChainConfig {
    type Error = CoreError;

    fn try_from(repr: ChainConfigRepr) -> Result<Self, Self::Error> {
        let engine = match (repr.ethash, repr.clique) {
            (Some(_), Some(_)) => return Err(CoreError::ConflictingEngines),
            (Some(_), None) => Engine::ProofOfWork,
            (None, Some(clique)) => Engine::ProofOfAuthority(clique),
            (None, None) => Engine::None,
        };
        Ok(ChainConfig {
            chain_id: repr.chain_id,
            homestead_block: repr.homestead_block,
            eip7_block: repr.eip7_block,
            dao_fork_block: repr.dao_fork_block,
            dao_fork_support: repr.dao_fork_support,
            eip150_block: repr.eip150_block,
            eip150_hash: repr.eip150_hash,
            eip155_block: repr.eip155_block,
            eip158_block: repr.eip158_block,
            byzantium_block: repr.byzantium_block,
            eip100_block: repr.eip100_block,
            eip140_block: repr.eip140_block,
            eip198_block: repr.eip198_block,
            eip211_block: repr.eip211_block,
            eip212_block: repr.eip212_block,
            eip213_block: repr.eip213_block,
            eip214_block: repr.eip214_block,
            eip649_block: repr.eip649_block,
            eip658_block: repr.eip658_block,
            constantinople_block: repr.constantinople_block,
            eip145_block: repr.eip145_block,
            eip1014_block: repr.eip1014_block,
            eip1052_block: repr.eip1052_block,
            eip1234_block: repr.eip1234_block,
            eip1283_block: repr.eip1283_block,
            ewasm_block: repr.ewasm_block,
            engine,
        })
    }
}

impl From<ChainConfig> for ChainConfigRepr {
    fn from(config: ChainConfig) -> Self {
        let (ethash, clique) = match config.engine {
            Engine::None => (None, None),
            Engine::ProofOfWork => (Some(EthashConfig {}), None),
            Engine::ProofOfAuthority(clique) => (None, Some(clique)),
        };
        ChainConfigRepr {
            chain_id: config.chain_id,
            homestead_block: config.homestead_block,
            eip7_block: config.eip7_block,
            dao_fork_block: config.dao_fork_block,
            dao_fork_support: config.dao_fork_support,
            eip150_block: config.eip150_block,
            eip150_hash: config.eip150_hash,
            eip155_block: config.eip155_block,
            eip158_block: config.eip158_block,
            byzantium_block: config.byzantium_block,
            eip100_block: config.eip100_block,
            eip140_block: config.eip140_block,
            eip198_block: config.eip198_block,
            eip211_block: config.eip211_block,
            eip212_block: config.eip212_block,
            eip213_block: config.eip213_block,
            eip214_block: config.eip214_block,
            eip649_block: config.eip649_block,
            eip658_block: config.eip658_block,
            constantinople_block: config.constantinople_block,
            eip145_block: config.eip145_block,
            eip1014_block: config.eip1014_block,
            eip1052_block: config.eip1052_block,
            eip1234_block: config.eip1234_block,
            eip1283_block: config.eip1283_block,
            ewasm_block: config.ewasm_block,
            ethash,
            clique,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bn(n: u64) -> BlockNumber {
        BlockNumber::new(n)
    }

    #[test]
    fn test_fork_block_accessor_covers_every_axis() {
        let mut config = ChainConfig::default();
        for (i, fork) in Fork::ALL.iter().enumerate() {
            config.set_fork_block(*fork, Some(bn(i as u64 + 1)));
        }
        for (i, fork) in Fork::ALL.iter().enumerate() {
            assert_eq!(config.fork_block(*fork), Some(&bn(i as u64 + 1)), "{fork}");
        }
    }

    #[test]
    fn test_json_field_names() {
        let config = ChainConfig {
            chain_id: Some(ChainId::new(1)),
            homestead_block: Some(bn(1_150_000)),
            eip1014_block: Some(bn(7)),
            dao_fork_support: true,
            engine: Engine::ProofOfWork,
            ..ChainConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "chainId": 1,
                "homesteadBlock": 1150000,
                "daoForkSupport": true,
                "eip1014Block": 7,
                "ethash": {}
            })
        );
    }

    #[test]
    fn test_json_clique_engine() {
        let json = r#"{"chainId": 4, "homesteadBlock": 1, "clique": {"period": 15, "epoch": 30000}}"#;
        let config: ChainConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.engine,
            Engine::ProofOfAuthority(CliqueConfig {
                period: 15,
                epoch: 30000
            })
        );
        assert_eq!(config.clique().map(|c| c.period), Some(15));
    }

    #[test]
    fn test_json_rejects_two_engines() {
        let json = r#"{"ethash": {}, "clique": {"period": 15, "epoch": 30000}}"#;
        let err = serde_json::from_str::<ChainConfig>(json).unwrap_err();
        assert!(err.to_string().contains("conflicting consensus engines"));
    }

    #[test]
    fn test_json_empty_document() {
        let config: ChainConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ChainConfig::default());
        assert_eq!(config.engine, Engine::None);
    }

    #[test]
    fn test_display_summary() {
        let config = ChainConfig {
            chain_id: Some(ChainId::new(1)),
            homestead_block: Some(bn(0)),
            engine: Engine::ProofOfWork,
            ..ChainConfig::default()
        };
        assert_eq!(
            config.to_string(),
            "{ChainID: 1 Homestead: 0 DAO: <nil> DAOSupport: false EIP150: <nil> EIP155: <nil> \
             EIP158: <nil> Byzantium: <nil> Constantinople: <nil> Engine: ethash}"
        );
    }

    #[test]
    fn test_group_accessors() {
        let config = ChainConfig {
            eip100_block: Some(bn(1)),
            eip658_block: Some(bn(9)),
            eip1283_block: Some(bn(5)),
            ..ChainConfig::default()
        };
        let byzantium = config.byzantium_eip_blocks();
        assert_eq!(byzantium[0], Some(&bn(1)));
        assert_eq!(byzantium[8], Some(&bn(9)));
        assert_eq!(config.constantinople_eip_blocks()[4], Some(&bn(5)));
    }
}
