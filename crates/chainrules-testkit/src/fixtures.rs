//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::io;
use std::path::{Path, PathBuf};

use chainrules_core::{BlockNumber, ChainConfig, ChainId, Engine, Fork};

/// A configuration with only the listed thresholds set.
pub fn config_with(forks: &[(Fork, u64)]) -> ChainConfig {
    forks
        .iter()
        .fold(ChainConfig::default(), |config, (fork, block)| {
            config.with_fork_block(*fork, *block)
        })
}

/// A copy of `config` with `fork` moved to `block`, or unset when `None`.
pub fn reschedule(config: &ChainConfig, fork: Fork, block: Option<u64>) -> ChainConfig {
    let mut config = config.clone();
    config.set_fork_block(fork, block.map(BlockNumber::new));
    config
}

/// A stored/candidate pair, for building up a compatibility scenario.
#[derive(Debug, Clone)]
pub struct CompatFixture {
    pub stored: ChainConfig,
    pub candidate: ChainConfig,
}

impl CompatFixture {
    /// Start with identical stored and candidate configurations.
    pub fn new(base: &ChainConfig) -> Self {
        Self {
            stored: base.clone(),
            candidate: base.clone(),
        }
    }

    /// A mainnet-style ethash chain with every fork a few blocks apart.
    pub fn staggered() -> Self {
        let mut config = config_with(&[
            (Fork::Homestead, 10),
            (Fork::Dao, 20),
            (Fork::Eip150, 30),
            (Fork::Eip155, 40),
            (Fork::Eip158, 40),
            (Fork::Byzantium, 50),
            (Fork::Constantinople, 60),
        ]);
        config.chain_id = Some(ChainId::new(1));
        config.dao_fork_support = true;
        config.engine = Engine::ProofOfWork;
        Self::new(&config)
    }

    /// Move `fork` in the candidate.
    pub fn reschedule(mut self, fork: Fork, block: Option<u64>) -> Self {
        self.candidate = reschedule(&self.candidate, fork, block);
        self
    }

    /// Change the candidate's chain id.
    pub fn chain_id(mut self, id: u64) -> Self {
        self.candidate.chain_id = Some(ChainId::new(id));
        self
    }

    /// Flip the candidate's DAO support flag.
    pub fn flip_dao_support(mut self) -> Self {
        self.candidate.dao_fork_support = !self.candidate.dao_fork_support;
        self
    }

    /// Write the stored config as JSON to `dir/stored.json` and the candidate
    /// to `dir/candidate.json`.
    pub fn write_json(&self, dir: &Path) -> io::Result<(PathBuf, PathBuf)> {
        let stored = write_config_json(dir, "stored.json", &self.stored)?;
        let candidate = write_config_json(dir, "candidate.json", &self.candidate)?;
        Ok((stored, candidate))
    }
}

/// Serialize `config` to `dir/name` as pretty JSON.
pub fn write_config_json(dir: &Path, name: &str, config: &ChainConfig) -> io::Result<PathBuf> {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with() {
        let config = config_with(&[(Fork::Homestead, 5), (Fork::Eip1283, 9)]);
        assert_eq!(config.homestead_block, Some(BlockNumber::new(5)));
        assert_eq!(config.eip1283_block, Some(BlockNumber::new(9)));
        assert_eq!(config.eip150_block, None);
    }

    #[test]
    fn test_staggered_is_ordered() {
        let fixture = CompatFixture::staggered();
        assert!(fixture.stored.ordering_violations().is_empty());
        assert_eq!(fixture.stored, fixture.candidate);
    }

    #[test]
    fn test_reschedule_leaves_stored() {
        let fixture = CompatFixture::staggered().reschedule(Fork::Eip150, None);
        assert_eq!(fixture.stored.eip150_block, Some(BlockNumber::new(30)));
        assert_eq!(fixture.candidate.eip150_block, None);
    }
}
