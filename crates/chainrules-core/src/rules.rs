//! Rules: the active protocol rules of one block.
//!
//! A snapshot is evaluated once for a height and must not be carried across
//! a fork boundary; build a new one for every block.

use crate::config::ChainConfig;
use crate::forks::Fork;
use crate::types::{BlockNumber, ChainId};

/// Height-bound evaluation of every activation predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    /// Chain id, zero when the configuration leaves it unset.
    pub chain_id: ChainId,

    pub is_homestead: bool,
    pub is_eip7: bool,
    pub is_dao_fork: bool,
    pub is_eip150: bool,
    pub is_eip155: bool,
    pub is_eip158: bool,

    pub is_byzantium: bool,
    pub is_eip100: bool,
    pub is_eip140: bool,
    pub is_eip198: bool,
    pub is_eip211: bool,
    pub is_eip212: bool,
    pub is_eip213: bool,
    pub is_eip214: bool,
    pub is_eip649: bool,
    pub is_eip658: bool,

    pub is_constantinople: bool,
    pub is_eip145: bool,
    pub is_eip1014: bool,
    pub is_eip1052: bool,
    pub is_eip1234: bool,
    pub is_eip1283: bool,

    pub is_ewasm: bool,
}

impl Rules {
    /// Evaluate `config` at block `num`.
    pub fn build(config: &ChainConfig, num: &BlockNumber) -> Self {
        Self {
            chain_id: config.chain_id.clone().unwrap_or_default(),

            is_homestead: config.is_homestead(num),
            is_eip7: config.is_eip7(num),
            is_dao_fork: config.is_dao_fork(num),
            is_eip150: config.is_eip150(num),
            is_eip155: config.is_eip155(num),
            is_eip158: config.is_eip158(num),

            is_byzantium: config.is_byzantium(num),
            is_eip100: config.is_eip100(num),
            is_eip140: config.is_eip140(num),
            is_eip198: config.is_eip198(num),
            is_eip211: config.is_eip211(num),
            is_eip212: config.is_eip212(num),
            is_eip213: config.is_eip213(num),
            is_eip214: config.is_eip214(num),
            is_eip649: config.is_eip649(num),
            is_eip658: config.is_eip658(num),

            is_constantinople: config.is_constantinople(num),
            is_eip145: config.is_eip145(num),
            is_eip1014: config.is_eip1014(num),
            is_eip1052: config.is_eip1052(num),
            is_eip1234: config.is_eip1234(num),
            is_eip1283: config.is_eip1283(num),

            is_ewasm: config.is_ewasm(num),
        }
    }

    /// Look up the flag for `fork`.
    pub fn is_active(&self, fork: Fork) -> bool {
        match fork {
            Fork::Homestead => self.is_homestead,
            Fork::Eip7 => self.is_eip7,
            Fork::Dao => self.is_dao_fork,
            Fork::Eip150 => self.is_eip150,
            Fork::Eip155 => self.is_eip155,
            Fork::Eip158 => self.is_eip158,
            Fork::Byzantium => self.is_byzantium,
            Fork::Eip100 => self.is_eip100,
            Fork::Eip140 => self.is_eip140,
            Fork::Eip198 => self.is_eip198,
            Fork::Eip211 => self.is_eip211,
            Fork::Eip212 => self.is_eip212,
            Fork::Eip213 => self.is_eip213,
            Fork::Eip214 => self.is_eip214,
            Fork::Eip649 => self.is_eip649,
            Fork::Eip658 => self.is_eip658,
            Fork::Constantinople => self.is_constantinople,
            Fork::Eip145 => self.is_eip145,
            Fork::Eip1014 => self.is_eip1014,
            Fork::Eip1052 => self.is_eip1052,
            Fork::Eip1234 => self.is_eip1234,
            Fork::Eip1283 => self.is_eip1283,
            Fork::Ewasm => self.is_ewasm,
        }
    }
}

impl ChainConfig {
    /// Shorthand for [`Rules::build`].
    pub fn rules(&self, num: &BlockNumber) -> Rules {
        Rules::build(self, num)
    }
}
