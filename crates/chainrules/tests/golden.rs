//! Golden vectors through the public API.
//!
//! Every vector must produce the same outcome when both configurations are
//! stored as JSON and read back, as a node does across restarts.

use chainrules::core::{canonical_config_bytes, config_fingerprint, decode_config};
use chainrules::{check_compatible, load_config_json, ChainConfig};
use chainrules_testkit::vectors::{all_vectors, encoding_vectors, verify_all_vectors};

fn through_json(config: &ChainConfig) -> ChainConfig {
    let json = serde_json::to_string(config).unwrap();
    load_config_json(&json).unwrap()
}

#[test]
fn test_verify_all_vectors() {
    let results = verify_all_vectors();
    assert!(!results.is_empty());
    for (name, matches, actual) in results {
        assert!(matches, "vector '{name}' produced {actual}");
    }
}

#[test]
fn test_vectors_survive_json_storage() {
    for vector in all_vectors() {
        let stored = through_json(&vector.stored);
        let candidate = through_json(&vector.candidate);
        assert_eq!(
            check_compatible(&stored, &candidate, vector.head.clone()),
            vector.expected,
            "vector '{}'",
            vector.name
        );
    }
}

#[test]
fn test_fingerprint_survives_json_storage() {
    for vector in all_vectors() {
        let reloaded = through_json(&vector.stored);
        assert_eq!(
            config_fingerprint(&reloaded).unwrap(),
            config_fingerprint(&vector.stored).unwrap(),
            "vector '{}'",
            vector.name
        );
    }
}

#[test]
fn test_encoding_vectors_decode() {
    for vector in encoding_vectors() {
        let bytes = hex::decode(&vector.expected_hex).unwrap();
        assert_eq!(decode_config(&bytes).unwrap(), vector.config, "vector '{}'", vector.name);
        assert_eq!(canonical_config_bytes(&vector.config).unwrap(), bytes);
    }
}
