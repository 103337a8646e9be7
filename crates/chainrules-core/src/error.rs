//! Error types for chainrules core.

use thiserror::Error;

use crate::types::BlockNumber;

/// Core errors that can occur while parsing or encoding configurations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid integer literal: {0:?}")]
    InvalidNumber(String),

    #[error("conflicting consensus engines: both ethash and clique are configured")]
    ConflictingEngines,

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Raised when the locally stored chain was initialised with a configuration
/// that the candidate configuration would retroactively alter.
///
/// `stored` and `new` are the values of the diverging axis in each
/// configuration; `rewind_to` is the highest block the local chain may keep
/// before the candidate can be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "mismatching {what} in database (have {}, want {}, rewindto {rewind_to})",
    display_opt(.stored),
    display_opt(.new)
)]
pub struct ConfigCompatError {
    /// The axis that diverged, e.g. `"EIP150 fork block"`.
    pub what: String,
    /// Value in the stored configuration.
    pub stored: Option<BlockNumber>,
    /// Value in the candidate configuration.
    pub new: Option<BlockNumber>,
    /// Block to which the local chain must be rewound to resolve the conflict.
    pub rewind_to: BlockNumber,
}

impl ConfigCompatError {
    /// Build an error for `what`, deriving the rewind target from the two
    /// values: the lower of the set values, minus one, floored at genesis.
    pub fn new(
        what: impl Into<String>,
        stored: Option<&BlockNumber>,
        new: Option<&BlockNumber>,
    ) -> Self {
        let rewind_from = match (stored, new) {
            (None, n) => n,
            (Some(s), None) => Some(s),
            (Some(s), Some(n)) if s < n => Some(s),
            (Some(_), Some(n)) => Some(n),
        };
        let rewind_to = rewind_from
            .map(BlockNumber::saturating_pred)
            .unwrap_or_default();
        Self {
            what: what.into(),
            stored: stored.cloned(),
            new: new.cloned(),
            rewind_to,
        }
    }
}

fn display_opt(value: &Option<BlockNumber>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => "<nil>".to_string(),
    }
}
