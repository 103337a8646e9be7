//! Built-in network configurations.
//!
//! Every preset lists every field by name, so adding a field to
//! [`ChainConfig`] fails to compile until each preset decides its value.

use std::sync::OnceLock;

use serde::Serialize;

use crate::config::{ChainConfig, CliqueConfig, Engine};
use crate::types::{BlockNumber, ChainId, Hash32};

/// Genesis hash of the main network.
pub const MAINNET_GENESIS_HASH: Hash32 =
    Hash32::from_hex_const("d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3");

/// Genesis hash of the Ropsten test network.
pub const TESTNET_GENESIS_HASH: Hash32 =
    Hash32::from_hex_const("41941023680923e0fe4d74a34bdac8141f2540e3ae90623718e47d66d1ca4a2d");

/// Genesis hash of the Rinkeby test network.
pub const RINKEBY_GENESIS_HASH: Hash32 =
    Hash32::from_hex_const("6341fd3daf94b748c72ced5a5b26028f2474f5f00d824504e4fa37a75767e177");

/// Post-processed trie roots (CHT and BloomTrie) for a section of the
/// header chain, letting light clients start syncing from a known point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedCheckpoint {
    #[serde(skip)]
    pub name: &'static str,
    pub section_index: u64,
    pub section_head: Hash32,
    pub cht_root: Hash32,
    pub bloom_root: Hash32,
}

pub const MAINNET_TRUSTED_CHECKPOINT: TrustedCheckpoint = TrustedCheckpoint {
    name: "mainnet",
    section_index: 208,
    section_head: Hash32::from_hex_const(
        "5e9f7696c397d9df8f3b1abda857753575c6f5cff894e1a3d9e1a2af1bd9d6ac",
    ),
    cht_root: Hash32::from_hex_const(
        "954a63134f6897f015f026387c59c98c4dae7b336610ff5a143455aac9153e9d",
    ),
    bloom_root: Hash32::from_hex_const(
        "8006c5e44b14d90d7cc9cd5fa1cb48cf53697ee3bbbf4b76fdfa70b0242500a9",
    ),
};

pub const TESTNET_TRUSTED_CHECKPOINT: TrustedCheckpoint = TrustedCheckpoint {
    name: "testnet",
    section_index: 139,
    section_head: Hash32::from_hex_const(
        "9fad89a5e3b993c8339b9cf2cbbeb72cd08774ea6b71b105b3dd880420c618f4",
    ),
    cht_root: Hash32::from_hex_const(
        "c815833881989c5d2035147e1a79a33d22cbc5313e104ff01e6ab405bd28b317",
    ),
    bloom_root: Hash32::from_hex_const(
        "d94ee9f3c480858f53ec5d059aebdbb2e8d904702f100875ee59ec5f366e841d",
    ),
};

pub const RINKEBY_TRUSTED_CHECKPOINT: TrustedCheckpoint = TrustedCheckpoint {
    name: "rinkeby",
    section_index: 105,
    section_head: Hash32::from_hex_const(
        "ec8147d43f936258aaf1b9b9ec91b0a853abf7109f436a23649be809ea43d507",
    ),
    cht_root: Hash32::from_hex_const(
        "d92703b444846a3db928e87e450770e5d5cbe193131dc8f7c4cf18b4de925a75",
    ),
    bloom_root: Hash32::from_hex_const(
        "ff45a6f807138a2cde0cea0c209d9ce5ad8e43ccaae5a7c41af801bb72a1ef96",
    ),
};

fn at(n: u64) -> Option<BlockNumber> {
    Some(BlockNumber::new(n))
}

/// The main network.
pub fn mainnet() -> &'static ChainConfig {
    static CONFIG: OnceLock<ChainConfig> = OnceLock::new();
    CONFIG.get_or_init(|| ChainConfig {
        chain_id: Some(ChainId::new(1)),
        homestead_block: at(1_150_000),
        eip7_block: None,
        dao_fork_block: at(1_920_000),
        dao_fork_support: true,
        eip150_block: at(2_463_000),
        eip150_hash: Hash32::from_hex_const(
            "2086799aeebeae135c246c65021c82b4e15a2c451340993aacfd2751886514f0",
        ),
        eip155_block: at(2_675_000),
        eip158_block: at(2_675_000),
        byzantium_block: at(4_370_000),
        eip100_block: None,
        eip140_block: None,
        eip198_block: None,
        eip211_block: None,
        eip212_block: None,
        eip213_block: None,
        eip214_block: None,
        eip649_block: None,
        eip658_block: None,
        constantinople_block: at(7_080_000),
        eip145_block: None,
        eip1014_block: None,
        eip1052_block: None,
        eip1234_block: None,
        eip1283_block: None,
        ewasm_block: None,
        engine: Engine::ProofOfWork,
    })
}

/// The Ropsten test network.
pub fn testnet() -> &'static ChainConfig {
    static CONFIG: OnceLock<ChainConfig> = OnceLock::new();
    CONFIG.get_or_init(|| ChainConfig {
        chain_id: Some(ChainId::new(3)),
        homestead_block: at(0),
        eip7_block: None,
        dao_fork_block: None,
        dao_fork_support: true,
        eip150_block: at(0),
        eip150_hash: TESTNET_GENESIS_HASH,
        eip155_block: at(10),
        eip158_block: at(10),
        byzantium_block: at(1_700_000),
        eip100_block: None,
        eip140_block: None,
        eip198_block: None,
        eip211_block: None,
        eip212_block: None,
        eip213_block: None,
        eip214_block: None,
        eip649_block: None,
        eip658_block: None,
        constantinople_block: at(4_230_000),
        eip145_block: None,
        eip1014_block: None,
        eip1052_block: None,
        eip1234_block: None,
        eip1283_block: None,
        ewasm_block: None,
        engine: Engine::ProofOfWork,
    })
}

/// The Rinkeby test network.
pub fn rinkeby() -> &'static ChainConfig {
    static CONFIG: OnceLock<ChainConfig> = OnceLock::new();
    CONFIG.get_or_init(|| ChainConfig {
        chain_id: Some(ChainId::new(4)),
        homestead_block: at(1),
        eip7_block: None,
        dao_fork_block: None,
        dao_fork_support: true,
        eip150_block: at(2),
        eip150_hash: Hash32::from_hex_const(
            "9b095b36c15eaf13044373aef8ee0bd3a382a5abb92e402afa44b8249c3a90e9",
        ),
        eip155_block: at(3),
        eip158_block: at(3),
        byzantium_block: at(1_035_301),
        eip100_block: None,
        eip140_block: None,
        eip198_block: None,
        eip211_block: None,
        eip212_block: None,
        eip213_block: None,
        eip214_block: None,
        eip649_block: None,
        eip658_block: None,
        constantinople_block: at(3_660_663),
        eip145_block: None,
        eip1014_block: None,
        eip1052_block: None,
        eip1234_block: None,
        eip1283_block: None,
        ewasm_block: None,
        engine: Engine::ProofOfAuthority(CliqueConfig {
            period: 15,
            epoch: 30000,
        }),
    })
}

/// Every protocol change active from genesis, under the given engine.
fn all_protocol_changes(chain_id: u64, engine: Engine) -> ChainConfig {
    ChainConfig {
        chain_id: Some(ChainId::new(chain_id)),
        homestead_block: at(0),
        eip7_block: None,
        dao_fork_block: None,
        dao_fork_support: false,
        eip150_block: at(0),
        eip150_hash: Hash32::ZERO,
        eip155_block: at(0),
        eip158_block: at(0),
        byzantium_block: at(0),
        eip100_block: None,
        eip140_block: None,
        eip198_block: None,
        eip211_block: None,
        eip212_block: None,
        eip213_block: None,
        eip214_block: None,
        eip649_block: None,
        eip658_block: None,
        constantinople_block: at(0),
        eip145_block: None,
        eip1014_block: None,
        eip1052_block: None,
        eip1234_block: None,
        eip1283_block: None,
        ewasm_block: None,
        engine,
    }
}

/// Every protocol change accepted into ethash consensus, active from genesis.
pub fn all_ethash_protocol_changes() -> &'static ChainConfig {
    static CONFIG: OnceLock<ChainConfig> = OnceLock::new();
    CONFIG.get_or_init(|| all_protocol_changes(1337, Engine::ProofOfWork))
}

/// Every protocol change accepted into clique consensus, active from genesis.
pub fn all_clique_protocol_changes() -> &'static ChainConfig {
    static CONFIG: OnceLock<ChainConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        all_protocol_changes(
            1337,
            Engine::ProofOfAuthority(CliqueConfig {
                period: 0,
                epoch: 30000,
            }),
        )
    })
}

/// Configuration for tests: chain id 1, everything from genesis, ethash.
pub fn test_chain_config() -> &'static ChainConfig {
    static CONFIG: OnceLock<ChainConfig> = OnceLock::new();
    CONFIG.get_or_init(|| all_protocol_changes(1, Engine::ProofOfWork))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forks::Fork;

    #[test]
    fn test_presets_are_ordered() {
        for config in [
            mainnet(),
            testnet(),
            rinkeby(),
            all_ethash_protocol_changes(),
            all_clique_protocol_changes(),
            test_chain_config(),
        ] {
            assert!(config.ordering_violations().is_empty(), "{config}");
        }
    }

    #[test]
    fn test_presets_are_shared() {
        assert!(std::ptr::eq(mainnet(), mainnet()));
    }

    #[test]
    fn test_mainnet_schedule() {
        let config = mainnet();
        assert!(config.is_homestead(&BlockNumber::new(1_150_000)));
        assert!(!config.is_homestead(&BlockNumber::new(1_149_999)));
        assert!(config.is_byzantium(&BlockNumber::new(4_370_000)));
        assert!(config.is_eip658(&BlockNumber::new(4_370_000)));
        assert!(!config.is_eip1014(&BlockNumber::new(7_079_999)));
        assert!(config.is_eip1014(&BlockNumber::new(7_080_000)));
        assert!(!config.is_ewasm(&BlockNumber::new(100_000_000)));
    }

    #[test]
    fn test_umbrella_units_follow_umbrella_in_presets() {
        // Units are unset in every preset, so each unit tracks its umbrella
        // exactly around the umbrella's threshold.
        for config in [mainnet(), testnet(), rinkeby()] {
            for umbrella in [Fork::Byzantium, Fork::Constantinople] {
                let block = config.fork_block(umbrella).unwrap();
                for num in [BlockNumber::new(0), block.saturating_pred(), block.clone(), block.succ()] {
                    let expected = config.is_fork_active(umbrella, &num);
                    for unit in umbrella.constituents().unwrap() {
                        assert_eq!(config.is_fork_active(*unit, &num), expected, "{unit} at {num}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_engines() {
        assert_eq!(mainnet().engine, Engine::ProofOfWork);
        assert_eq!(rinkeby().clique().map(|c| (c.period, c.epoch)), Some((15, 30000)));
        assert_eq!(
            all_clique_protocol_changes().clique().map(|c| c.period),
            Some(0)
        );
    }

    #[test]
    fn test_checkpoint_serializes_without_name() {
        let value = serde_json::to_value(MAINNET_TRUSTED_CHECKPOINT).unwrap();
        assert_eq!(value["sectionIndex"], 208);
        assert!(value.get("name").is_none());
        assert_eq!(
            value["chtRoot"],
            "0x954a63134f6897f015f026387c59c98c4dae7b336610ff5a143455aac9153e9d"
        );
    }
}
