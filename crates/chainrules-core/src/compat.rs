//! Compatibility checking between a stored and a candidate configuration.
//!
//! A candidate configuration may reschedule any fork the local chain has not
//! reached yet. Changing anything the chain has already processed would
//! rewrite history, so the checker reports the lowest such conflict together
//! with the height the local chain must be rewound to before the candidate
//! can be applied.

use crate::config::ChainConfig;
use crate::error::ConfigCompatError;
use crate::forks::{is_active, Fork};
use crate::types::BlockNumber;

/// Check whether `candidate` can replace `stored` on a chain whose head is
/// at `head`.
///
/// The single-pass check is repeated from each reported rewind target until
/// it either passes or reports the same rewind target twice, so the result
/// names the lowest conflicting fork rather than the first one found at the
/// original head.
pub fn check_compatible(
    stored: &ChainConfig,
    candidate: &ChainConfig,
    head: impl Into<BlockNumber>,
) -> Option<ConfigCompatError> {
    let mut bhead = head.into();
    let mut last: Option<ConfigCompatError> = None;

    loop {
        let Some(err) = check_compatible_at(stored, candidate, &bhead) else {
            break;
        };
        if last.as_ref().is_some_and(|prev| prev.rewind_to == err.rewind_to) {
            break;
        }
        tracing::debug!(
            head = %bhead,
            axis = %err.what,
            rewind_to = %err.rewind_to,
            "config conflict, descending"
        );
        bhead = err.rewind_to.clone();
        last = Some(err);
    }

    match &last {
        Some(err) => tracing::debug!(axis = %err.what, rewind_to = %err.rewind_to, "config incompatible"),
        None => tracing::debug!("config compatible"),
    }
    last
}

/// One comparison pass at a fixed head.
pub fn check_compatible_at(
    stored: &ChainConfig,
    candidate: &ChainConfig,
    head: &BlockNumber,
) -> Option<ConfigCompatError> {
    for fork in Fork::ALL {
        let (s, c) = (stored.fork_block(fork), candidate.fork_block(fork));
        if is_fork_incompatible(s, c, head) {
            return Some(ConfigCompatError::new(format!("{fork} fork block"), s, c));
        }
    }

    // These two report the fork thresholds rather than the differing flag or
    // chain id; callers match on that shape.
    if stored.is_dao_fork(head) && stored.dao_fork_support != candidate.dao_fork_support {
        return Some(ConfigCompatError::new(
            "DAO fork support flag",
            stored.dao_fork_block.as_ref(),
            candidate.dao_fork_block.as_ref(),
        ));
    }
    if stored.is_eip158(head) && stored.chain_id != candidate.chain_id {
        return Some(ConfigCompatError::new(
            "EIP158 chain ID",
            stored.eip158_block.as_ref(),
            candidate.eip158_block.as_ref(),
        ));
    }

    // Without a Byzantium threshold, EIP100 and EIP649 must move together.
    if candidate.byzantium_block.is_none() {
        let (c100, c649) = (
            candidate.eip100_block.as_ref(),
            candidate.eip649_block.as_ref(),
        );
        if c100 != c649 {
            return Some(ConfigCompatError::new("EIP100/EIP649 not equal", c100, c649));
        }
        let s100 = stored.eip100_block.as_ref();
        if is_fork_incompatible(s100, c649, head) {
            return Some(ConfigCompatError::new("EIP100/649 fork block", s100, c649));
        }
        let s649 = stored.eip649_block.as_ref();
        if is_fork_incompatible(s649, c100, head) {
            return Some(ConfigCompatError::new("EIP649/100 fork block", s649, c100));
        }
    }

    None
}

/// Whether a fork scheduled at `stored` cannot be moved to `new` because
/// `head` is already past one of them.
pub fn is_fork_incompatible(
    stored: Option<&BlockNumber>,
    new: Option<&BlockNumber>,
    head: &BlockNumber,
) -> bool {
    (is_active(stored, Some(head)) || is_active(new, Some(head))) && stored != new
}

impl ChainConfig {
    /// Shorthand for [`check_compatible`] with `self` as the stored config.
    pub fn check_compatible(
        &self,
        candidate: &ChainConfig,
        head: impl Into<BlockNumber>,
    ) -> Option<ConfigCompatError> {
        check_compatible(self, candidate, head)
    }
}
