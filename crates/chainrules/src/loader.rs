//! Loading chain configurations from JSON.

use std::path::Path;

use chainrules_core::ChainConfig;

use crate::error::Result;

/// Parse a configuration from a JSON document.
pub fn load_config_json(json: &str) -> Result<ChainConfig> {
    let config: ChainConfig = serde_json::from_str(json)?;

    let violations = config.ordering_violations();
    if !violations.is_empty() {
        tracing::warn!(?violations, "config schedules forks out of order");
    }
    Ok(config)
}

/// Read and parse a JSON configuration file.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<ChainConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let config = load_config_json(&json)?;
    tracing::debug!(path = %path.display(), %config, "loaded chain config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainRulesError;
    use chainrules_core::{BlockNumber, CoreError, Engine};

    #[test]
    fn test_load_minimal() {
        let config =
            load_config_json(r#"{"chainId": 5, "homesteadBlock": 0, "ethash": {}}"#).unwrap();
        assert_eq!(config.homestead_block, Some(BlockNumber::new(0)));
        assert_eq!(config.engine, Engine::ProofOfWork);
    }

    #[test]
    fn test_load_numbers_above_u64() {
        let config = load_config_json(
            r#"{"chainId": 18446744073709551617, "ewasmBlock": 18446744073709551616, "ethash": {}}"#,
        )
        .unwrap();
        let ewasm = BlockNumber::new(u64::MAX).succ();
        assert_eq!(config.ewasm_block, Some(ewasm.clone()));
        assert_eq!(config.chain_id.as_ref().map(|id| id.to_string()).as_deref(), Some("18446744073709551617"));

        // Written back as a string, read back unchanged.
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""ewasmBlock":"18446744073709551616""#));
        assert_eq!(load_config_json(&json).unwrap().ewasm_block, Some(ewasm));
    }

    #[test]
    fn test_out_of_order_still_loads() {
        let config = load_config_json(r#"{"homesteadBlock": 10, "eip150Block": 5}"#).unwrap();
        assert!(!config.ordering_violations().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            load_config_json("{\"homesteadBlock\": -1}"),
            Err(ChainRulesError::Json(_))
        ));
        assert!(matches!(
            load_config_json("not json"),
            Err(ChainRulesError::Json(_))
        ));
    }

    #[test]
    fn test_conflicting_engines_is_json_error() {
        let err = load_config_json(r#"{"ethash": {}, "clique": {"period": 1, "epoch": 2}}"#)
            .unwrap_err();
        // serde surfaces the core error's message through serde_json.
        assert!(matches!(err, ChainRulesError::Json(_)));
        assert!(err.to_string().contains(&CoreError::ConflictingEngines.to_string()));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config_file("/nonexistent/chain.json"),
            Err(ChainRulesError::Io(_))
        ));
    }
}
