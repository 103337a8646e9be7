//! Startup decision: what to do when a node opens a database whose stored
//! configuration differs from the one it was started with.
//!
//! The checker only reports a conflict and a rewind target. Whether the node
//! may actually discard blocks is a policy choice made here.

use chainrules_core::{check_compatible, BlockNumber, ChainConfig, ConfigCompatError};

use crate::error::{ChainRulesError, Result};

/// How a node reacts to an incompatible configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupPolicy {
    /// Whether the node may rewind its chain to apply the new configuration.
    /// When false every conflict is refused.
    pub allow_rewind: bool,
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupDecision {
    /// The candidate can be applied as is.
    Accept,
    /// Rewind the chain to `to`, then apply the candidate.
    Rewind {
        to: BlockNumber,
        cause: ConfigCompatError,
    },
    /// The candidate cannot be applied.
    Refuse(ConfigCompatError),
}

impl StartupDecision {
    /// Collapse into a rewind target, refusing with an error.
    pub fn into_result(self) -> Result<Option<BlockNumber>> {
        match self {
            StartupDecision::Accept => Ok(None),
            StartupDecision::Rewind { to, .. } => Ok(Some(to)),
            StartupDecision::Refuse(cause) => Err(ChainRulesError::Compat(cause)),
        }
    }
}

/// Compare `stored` against `candidate` at `head` and apply `policy`.
///
/// A rewind is only offered when the target lies below the head; a target
/// at or above the head means there is nothing to discard and the conflict
/// cannot be resolved by rewinding.
pub fn decide(
    stored: &ChainConfig,
    candidate: &ChainConfig,
    head: impl Into<BlockNumber>,
    policy: StartupPolicy,
) -> StartupDecision {
    let head = head.into();

    let Some(cause) = check_compatible(stored, candidate, head.clone()) else {
        tracing::info!(%head, config = %candidate, "chain config accepted");
        return StartupDecision::Accept;
    };

    if policy.allow_rewind && cause.rewind_to < head {
        tracing::warn!(%head, rewind_to = %cause.rewind_to, %cause, "rewinding chain for new config");
        return StartupDecision::Rewind {
            to: cause.rewind_to.clone(),
            cause,
        };
    }

    tracing::warn!(%head, allow_rewind = policy.allow_rewind, %cause, "refusing new chain config");
    StartupDecision::Refuse(cause)
}
