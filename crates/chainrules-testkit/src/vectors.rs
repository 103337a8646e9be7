//! Golden test vectors for deterministic verification.
//!
//! Compatibility vectors pin the checker's outcome, including the exact
//! axis name and rewind target, for known schedule changes. Encoding vectors
//! pin the canonical CBOR bytes of small configurations.

use num_bigint::BigUint;

use chainrules_core::presets;
use chainrules_core::{
    canonical_config_bytes, check_compatible, BlockNumber, ChainConfig, CliqueConfig,
    ConfigCompatError, Engine, Fork,
};

use crate::fixtures::{config_with, CompatFixture};

/// A compatibility test vector.
#[derive(Debug, Clone)]
pub struct CompatVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub stored: ChainConfig,
    pub candidate: ChainConfig,
    pub head: BlockNumber,
    /// `None` when the candidate is compatible.
    pub expected: Option<ConfigCompatError>,
}

impl CompatVector {
    /// Run the checker on this vector.
    pub fn run(&self) -> Option<ConfigCompatError> {
        check_compatible(&self.stored, &self.candidate, self.head.clone())
    }
}

/// A canonical encoding test vector.
#[derive(Debug, Clone)]
pub struct EncodingVector {
    pub name: &'static str,
    pub config: ChainConfig,
    /// Expected canonical bytes (hex).
    pub expected_hex: String,
}

fn conflict(what: &str, stored: Option<u64>, new: Option<u64>, rewind_to: u64) -> Option<ConfigCompatError> {
    Some(ConfigCompatError {
        what: what.to_string(),
        stored: stored.map(BlockNumber::new),
        new: new.map(BlockNumber::new),
        rewind_to: BlockNumber::new(rewind_to),
    })
}

fn pow2(exp: u32) -> BlockNumber {
    BlockNumber::from(BigUint::from(1u8) << exp)
}

/// Get all compatibility vectors.
pub fn all_vectors() -> Vec<CompatVector> {
    let all_ethash = presets::all_ethash_protocol_changes();
    let staggered = CompatFixture::staggered();
    let big = pow2(70);

    vec![
        CompatVector {
            name: "identical mainnet",
            stored: presets::mainnet().clone(),
            candidate: presets::mainnet().clone(),
            head: BlockNumber::new(7_080_000),
            expected: None,
        },
        CompatVector {
            name: "reschedule before head",
            stored: config_with(&[(Fork::Eip150, 10)]),
            candidate: config_with(&[(Fork::Eip150, 20)]),
            head: BlockNumber::new(9),
            expected: None,
        },
        CompatVector {
            name: "unset active homestead",
            stored: all_ethash.clone(),
            candidate: ChainConfig::default(),
            head: BlockNumber::new(3),
            expected: conflict("Homestead fork block", Some(0), None, 0),
        },
        CompatVector {
            name: "move active homestead",
            stored: all_ethash.clone(),
            candidate: config_with(&[(Fork::Homestead, 1)]),
            head: BlockNumber::new(3),
            expected: conflict("Homestead fork block", Some(0), Some(1), 0),
        },
        CompatVector {
            name: "descend to lowest conflict",
            stored: config_with(&[(Fork::Homestead, 30), (Fork::Eip150, 10)]),
            candidate: config_with(&[(Fork::Homestead, 25), (Fork::Eip150, 20)]),
            head: BlockNumber::new(25),
            expected: conflict("EIP150 fork block", Some(10), Some(20), 9),
        },
        CompatVector {
            name: "EIP100 and EIP649 differ",
            stored: config_with(&[(Fork::Eip100, 30), (Fork::Eip649, 31)]),
            candidate: config_with(&[(Fork::Eip100, 30), (Fork::Eip649, 31)]),
            head: BlockNumber::new(25),
            expected: conflict("EIP100/EIP649 not equal", Some(30), Some(31), 29),
        },
        CompatVector {
            name: "EIP100 moved below head",
            stored: config_with(&[(Fork::Eip100, 30), (Fork::Eip649, 30)]),
            candidate: config_with(&[(Fork::Eip100, 24), (Fork::Eip649, 24)]),
            head: BlockNumber::new(25),
            expected: conflict("EIP100 fork block", Some(30), Some(24), 23),
        },
        CompatVector {
            name: "unit replaces unreached umbrella",
            stored: config_with(&[(Fork::Byzantium, 30)]),
            candidate: config_with(&[(Fork::Eip211, 26)]),
            head: BlockNumber::new(25),
            expected: None,
        },
        CompatVector {
            name: "lone EIP100",
            stored: config_with(&[(Fork::Byzantium, 30)]),
            candidate: config_with(&[(Fork::Eip100, 26)]),
            head: BlockNumber::new(25),
            expected: conflict("EIP100/EIP649 not equal", Some(26), None, 25),
        },
        CompatVector {
            name: "DAO support flipped",
            stored: staggered.stored.clone(),
            candidate: staggered.clone().flip_dao_support().candidate,
            head: BlockNumber::new(20),
            expected: conflict("DAO fork support flag", Some(20), Some(20), 19),
        },
        CompatVector {
            name: "chain id changed after EIP158",
            stored: staggered.stored.clone(),
            candidate: staggered.clone().chain_id(61).candidate,
            head: BlockNumber::new(45),
            expected: conflict("EIP158 chain ID", Some(40), Some(40), 39),
        },
        CompatVector {
            name: "chain id changed before EIP158",
            stored: staggered.stored.clone(),
            candidate: staggered.clone().chain_id(61).candidate,
            head: BlockNumber::new(39),
            expected: None,
        },
        CompatVector {
            name: "bignum threshold moved",
            stored: ChainConfig::default().with_fork_block(Fork::Ewasm, big.clone()),
            candidate: ChainConfig::default().with_fork_block(Fork::Ewasm, big.succ()),
            head: big.clone(),
            expected: Some(ConfigCompatError {
                what: "EWASM fork block".to_string(),
                stored: Some(big.clone()),
                new: Some(big.succ()),
                rewind_to: big.saturating_pred(),
            }),
        },
    ]
}

/// Get all canonical encoding vectors.
pub fn encoding_vectors() -> Vec<EncodingVector> {
    let zero_hash = "00".repeat(32);

    vec![
        EncodingVector {
            name: "empty config",
            config: ChainConfig::default(),
            expected_hex: format!("a50001 02f4 035820{zero_hash} 048100 05a0"),
        },
        EncodingVector {
            name: "chain id and homestead",
            config: {
                let mut config = config_with(&[(Fork::Homestead, 0)]);
                config.chain_id = Some(1u64.into());
                config.engine = Engine::ProofOfWork;
                config
            },
            expected_hex: format!("a60001 0101 02f4 035820{zero_hash} 048101 05a10000"),
        },
        EncodingVector {
            name: "clique with bignum ewasm",
            config: ChainConfig {
                engine: Engine::ProofOfAuthority(CliqueConfig {
                    period: 15,
                    epoch: 30000,
                }),
                ..ChainConfig::default()
            }
            .with_fork_block(Fork::Ewasm, pow2(64)),
            expected_hex: format!(
                "a50001 02f4 035820{zero_hash} 0483020f197530 05a116c249010000000000000000"
            ),
        },
    ]
    .into_iter()
    .map(|mut v| {
        v.expected_hex.retain(|c| c != ' ');
        v
    })
    .collect()
}

fn render(outcome: &Option<ConfigCompatError>) -> String {
    match outcome {
        Some(err) => err.to_string(),
        None => "compatible".to_string(),
    }
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, actual)` per vector, where `actual` is the
/// checker's message or the encoding in hex.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let compat = all_vectors().into_iter().map(|v| {
        let actual = v.run();
        (v.name.to_string(), actual == v.expected, render(&actual))
    });

    let encoding = encoding_vectors().into_iter().map(|v| {
        let actual = canonical_config_bytes(&v.config)
            .map(hex::encode)
            .unwrap_or_else(|e| e.to_string());
        (v.name.to_string(), actual == v.expected_hex, actual)
    });

    compat.chain(encoding).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced {actual}");
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            assert_eq!(vector.run(), vector.run(), "vector '{}'", vector.name);
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let mut names: Vec<_> = verify_all_vectors().into_iter().map(|(n, _, _)| n).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_error_message() {
        let vector = all_vectors()
            .into_iter()
            .find(|v| v.name == "unset active homestead")
            .unwrap();
        assert_eq!(
            render(&vector.run()),
            "mismatching Homestead fork block in database (have 0, want <nil>, rewindto 0)"
        );
    }
}
