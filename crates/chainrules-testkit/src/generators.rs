//! Proptest generators for property-based testing.

use num_bigint::BigUint;
use proptest::prelude::*;

use chainrules_core::{BlockNumber, ChainConfig, ChainId, CliqueConfig, Engine, Fork, Hash32};

/// Generate a block number, biased towards a small window so that
/// thresholds and heads collide often.
pub fn block_number() -> impl Strategy<Value = BlockNumber> {
    prop_oneof![
        8 => (0u64..64).prop_map(BlockNumber::new),
        1 => any::<u64>().prop_map(BlockNumber::new),
        1 => (any::<u64>(), 1u64..).prop_map(|(lo, hi)| {
            BlockNumber::from((BigUint::from(hi) << 64u32) + BigUint::from(lo))
        }),
    ]
}

/// Generate a threshold that is unset about a third of the time.
pub fn opt_block_number() -> impl Strategy<Value = Option<BlockNumber>> {
    prop::option::weighted(0.65, block_number())
}

/// Generate a height in the same small window as [`block_number`].
pub fn head() -> impl Strategy<Value = BlockNumber> {
    (0u64..80).prop_map(BlockNumber::new)
}

/// Generate a consensus engine.
pub fn engine() -> impl Strategy<Value = Engine> {
    prop_oneof![
        Just(Engine::None),
        Just(Engine::ProofOfWork),
        (any::<u64>(), any::<u64>())
            .prop_map(|(period, epoch)| Engine::ProofOfAuthority(CliqueConfig { period, epoch })),
    ]
}

/// Generate an arbitrary configuration. Every axis is independent, so the
/// result may schedule forks out of order.
pub fn chain_config() -> impl Strategy<Value = ChainConfig> {
    (
        prop::option::of(any::<u64>().prop_map(ChainId::new)),
        any::<bool>(),
        any::<[u8; 32]>(),
        engine(),
        prop::collection::vec(opt_block_number(), Fork::ALL.len()),
    )
        .prop_map(|(chain_id, dao_fork_support, hash, engine, blocks)| {
            let mut config = ChainConfig {
                chain_id,
                dao_fork_support,
                eip150_hash: Hash32(hash),
                engine,
                ..ChainConfig::default()
            };
            for (fork, block) in Fork::ALL.into_iter().zip(blocks) {
                config.set_fork_block(fork, block);
            }
            config
        })
}

/// Generate a configuration that is compatible with itself: without a
/// Byzantium threshold, EIP649 is paired with EIP100.
pub fn well_formed_config() -> impl Strategy<Value = ChainConfig> {
    chain_config().prop_map(pair_difficulty_units)
}

fn pair_difficulty_units(mut config: ChainConfig) -> ChainConfig {
    if config.byzantium_block.is_none() {
        config.eip649_block = config.eip100_block.clone();
    }
    config
}

/// A stored configuration, a candidate and a chain head.
#[derive(Debug, Clone)]
pub struct CompatCase {
    pub stored: ChainConfig,
    pub candidate: ChainConfig,
    pub head: BlockNumber,
}

impl Arbitrary for CompatCase {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        // Candidates are mostly small edits of the stored config; unrelated
        // pairs almost always conflict at the first axis.
        let edited = (
            well_formed_config(),
            prop::collection::vec(
                (prop::sample::select(Fork::ALL.to_vec()), opt_block_number()),
                0..4,
            ),
            head(),
        )
            .prop_map(|(stored, edits, head)| {
                let mut candidate = stored.clone();
                for (fork, block) in edits {
                    candidate.set_fork_block(fork, block);
                }
                CompatCase {
                    stored,
                    candidate: pair_difficulty_units(candidate),
                    head,
                }
            });
        let unrelated = (well_formed_config(), well_formed_config(), head()).prop_map(
            |(stored, candidate, head)| CompatCase {
                stored,
                candidate,
                head,
            },
        );

        prop_oneof![3 => edited, 1 => unrelated].boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrules_core::{
        canonical_config_bytes, check_compatible, check_compatible_at, decode_config, is_active,
        Rules,
    };

    proptest! {
        #[test]
        fn test_is_active_semantics(t in block_number(), h in block_number()) {
            prop_assert_eq!(is_active(Some(&t), Some(&h)), h >= t);
            prop_assert!(!is_active(None, Some(&h)));
            prop_assert!(!is_active(Some(&t), None));
        }

        #[test]
        fn test_umbrella_implies_constituents(config in chain_config(), num in head()) {
            for umbrella in [Fork::Homestead, Fork::Byzantium, Fork::Constantinople] {
                if !config.is_fork_active(umbrella, &num) {
                    continue;
                }
                for unit in Fork::ALL.iter().filter(|f| f.umbrella() == Some(umbrella)) {
                    prop_assert!(config.is_fork_active(*unit, &num), "{} under {}", unit, umbrella);
                }
            }
        }

        #[test]
        fn test_rules_match_predicates(config in chain_config(), num in head()) {
            let rules = Rules::build(&config, &num);
            for fork in Fork::ALL {
                prop_assert_eq!(rules.is_active(fork), config.is_fork_active(fork, &num));
            }
        }

        #[test]
        fn test_self_compatible(config in well_formed_config(), head in block_number()) {
            prop_assert_eq!(check_compatible(&config, &config, head), None);
        }

        #[test]
        fn test_descent_stops_at_fixed_point(case: CompatCase) {
            if let Some(err) = check_compatible(&case.stored, &case.candidate, case.head.clone()) {
                prop_assert!(err.rewind_to <= case.head);
                if let Some(again) = check_compatible_at(&case.stored, &case.candidate, &err.rewind_to) {
                    prop_assert_eq!(again.rewind_to, err.rewind_to);
                }
            }
        }

        #[test]
        fn test_compatible_at_head_means_compatible_below(case: CompatCase) {
            if check_compatible(&case.stored, &case.candidate, case.head.clone()).is_none() {
                let lower = case.head.saturating_pred();
                prop_assert_eq!(check_compatible(&case.stored, &case.candidate, lower), None);
            }
        }

        #[test]
        fn test_inputs_untouched(case: CompatCase) {
            let (stored, candidate) = (case.stored.clone(), case.candidate.clone());
            let _ = check_compatible(&case.stored, &case.candidate, case.head.clone());
            prop_assert_eq!(&case.stored, &stored);
            prop_assert_eq!(&case.candidate, &candidate);
        }

        #[test]
        fn test_json_roundtrip(config in chain_config()) {
            let json = serde_json::to_string(&config).unwrap();
            let decoded: ChainConfig = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(decoded, config);
        }

        #[test]
        fn test_canonical_roundtrip(config in chain_config()) {
            let bytes = canonical_config_bytes(&config).unwrap();
            prop_assert_eq!(decode_config(&bytes).unwrap(), config);
        }
    }
}
