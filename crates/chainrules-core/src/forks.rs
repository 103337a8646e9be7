//! Fork axes and activation predicates.
//!
//! A [`Fork`] names one height-triggered protocol change. Every fork has a
//! threshold slot in [`ChainConfig`], reached through
//! [`ChainConfig::fork_block`]; the table of axes is [`Fork::ALL`], in the
//! canonical order used by the compatibility checker.
//!
//! Two forks are umbrellas over a group of protocol-change units:
//! Byzantium (9 units) and Constantinople (5 units). An umbrella is active
//! when its own threshold is reached, or when every unit in its group has
//! independently reached its threshold. A unit is active when its umbrella
//! is, or when its own threshold is reached. EIP7 is a unit of Homestead,
//! but Homestead has no conjunction path.

use std::fmt;

use crate::config::ChainConfig;
use crate::types::BlockNumber;

/// A named fork or protocol-change unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fork {
    Homestead,
    Eip7,
    Dao,
    Eip150,
    Eip155,
    Eip158,
    Byzantium,
    Eip100,
    Eip140,
    Eip198,
    Eip211,
    Eip212,
    Eip213,
    Eip214,
    Eip649,
    Eip658,
    Constantinople,
    Eip145,
    Eip1014,
    Eip1052,
    Eip1234,
    Eip1283,
    Ewasm,
}

impl Fork {
    /// Every axis, in canonical comparison order.
    pub const ALL: [Fork; 23] = [
        Fork::Homestead,
        Fork::Eip7,
        Fork::Dao,
        Fork::Eip150,
        Fork::Eip155,
        Fork::Eip158,
        Fork::Byzantium,
        Fork::Eip100,
        Fork::Eip140,
        Fork::Eip198,
        Fork::Eip211,
        Fork::Eip212,
        Fork::Eip213,
        Fork::Eip214,
        Fork::Eip649,
        Fork::Eip658,
        Fork::Constantinople,
        Fork::Eip145,
        Fork::Eip1014,
        Fork::Eip1052,
        Fork::Eip1234,
        Fork::Eip1283,
        Fork::Ewasm,
    ];

    /// Units bundled under Byzantium.
    pub const BYZANTIUM_EIPS: [Fork; 9] = [
        Fork::Eip100,
        Fork::Eip140,
        Fork::Eip198,
        Fork::Eip211,
        Fork::Eip212,
        Fork::Eip213,
        Fork::Eip214,
        Fork::Eip649,
        Fork::Eip658,
    ];

    /// Units bundled under Constantinople.
    pub const CONSTANTINOPLE_EIPS: [Fork; 5] = [
        Fork::Eip145,
        Fork::Eip1014,
        Fork::Eip1052,
        Fork::Eip1234,
        Fork::Eip1283,
    ];

    /// Named forks in the order they are expected to be scheduled.
    pub const SCHEDULE: [Fork; 8] = [
        Fork::Homestead,
        Fork::Dao,
        Fork::Eip150,
        Fork::Eip155,
        Fork::Eip158,
        Fork::Byzantium,
        Fork::Constantinople,
        Fork::Ewasm,
    ];

    /// Human-readable axis name, as used in compatibility errors.
    pub const fn name(self) -> &'static str {
        match self {
            Fork::Homestead => "Homestead",
            Fork::Eip7 => "EIP7",
            Fork::Dao => "DAO",
            Fork::Eip150 => "EIP150",
            Fork::Eip155 => "EIP155",
            Fork::Eip158 => "EIP158",
            Fork::Byzantium => "Byzantium",
            Fork::Eip100 => "EIP100",
            Fork::Eip140 => "EIP140",
            Fork::Eip198 => "EIP198",
            Fork::Eip211 => "EIP211",
            Fork::Eip212 => "EIP212",
            Fork::Eip213 => "EIP213",
            Fork::Eip214 => "EIP214",
            Fork::Eip649 => "EIP649",
            Fork::Eip658 => "EIP658",
            Fork::Constantinople => "Constantinople",
            Fork::Eip145 => "EIP145",
            Fork::Eip1014 => "EIP1014",
            Fork::Eip1052 => "EIP1052",
            Fork::Eip1234 => "EIP1234",
            Fork::Eip1283 => "EIP1283",
            Fork::Ewasm => "EWASM",
        }
    }

    /// The fork whose activation implies this one, if any.
    pub const fn umbrella(self) -> Option<Fork> {
        match self {
            Fork::Eip7 => Some(Fork::Homestead),
            Fork::Eip100
            | Fork::Eip140
            | Fork::Eip198
            | Fork::Eip211
            | Fork::Eip212
            | Fork::Eip213
            | Fork::Eip214
            | Fork::Eip649
            | Fork::Eip658 => Some(Fork::Byzantium),
            Fork::Eip145 | Fork::Eip1014 | Fork::Eip1052 | Fork::Eip1234 | Fork::Eip1283 => {
                Some(Fork::Constantinople)
            }
            _ => None,
        }
    }

    /// The group whose joint activation implies this fork.
    ///
    /// `None` means the fork can only be activated by its own threshold.
    pub const fn constituents(self) -> Option<&'static [Fork]> {
        match self {
            Fork::Byzantium => Some(&Self::BYZANTIUM_EIPS),
            Fork::Constantinople => Some(&Self::CONSTANTINOPLE_EIPS),
            _ => None,
        }
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a fork scheduled at `threshold` is active at `height`.
///
/// Total: an unset threshold never activates, and an unset height is before
/// every fork.
pub fn is_active(threshold: Option<&BlockNumber>, height: Option<&BlockNumber>) -> bool {
    match (threshold, height) {
        (Some(t), Some(h)) => t <= h,
        _ => false,
    }
}

impl ChainConfig {
    /// Whether `fork` is active at block `num`, including activation through
    /// its umbrella or through its full group of units.
    pub fn is_fork_active(&self, fork: Fork, num: &BlockNumber) -> bool {
        if is_active(self.fork_block(fork), Some(num)) {
            return true;
        }
        if let Some(group) = fork.constituents() {
            if group
                .iter()
                .all(|unit| is_active(self.fork_block(*unit), Some(num)))
            {
                return true;
            }
        }
        match fork.umbrella() {
            Some(umbrella) => self.is_fork_active(umbrella, num),
            None => false,
        }
    }

    pub fn is_homestead(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Homestead, num)
    }

    pub fn is_eip7(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip7, num)
    }

    pub fn is_dao_fork(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Dao, num)
    }

    pub fn is_eip150(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip150, num)
    }

    pub fn is_eip155(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip155, num)
    }

    pub fn is_eip158(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip158, num)
    }

    pub fn is_byzantium(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Byzantium, num)
    }

    pub fn is_eip100(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip100, num)
    }

    pub fn is_eip140(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip140, num)
    }

    pub fn is_eip198(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip198, num)
    }

    pub fn is_eip211(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip211, num)
    }

    pub fn is_eip212(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip212, num)
    }

    pub fn is_eip213(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip213, num)
    }

    pub fn is_eip214(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip214, num)
    }

    pub fn is_eip649(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip649, num)
    }

    pub fn is_eip658(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip658, num)
    }

    pub fn is_constantinople(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Constantinople, num)
    }

    pub fn is_eip145(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip145, num)
    }

    pub fn is_eip1014(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip1014, num)
    }

    pub fn is_eip1052(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip1052, num)
    }

    pub fn is_eip1234(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip1234, num)
    }

    pub fn is_eip1283(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Eip1283, num)
    }

    pub fn is_ewasm(&self, num: &BlockNumber) -> bool {
        self.is_fork_active(Fork::Ewasm, num)
    }

    /// Pairs `(earlier, later)` of scheduled forks where `later` is set to
    /// activate before `earlier`.
    ///
    /// Only set thresholds take part; each is compared with the closest
    /// preceding set fork in [`Fork::SCHEDULE`].
    pub fn ordering_violations(&self) -> Vec<(Fork, Fork)> {
        let mut violations = Vec::new();
        let mut last: Option<(Fork, &BlockNumber)> = None;
        for fork in Fork::SCHEDULE {
            let Some(block) = self.fork_block(fork) else {
                continue;
            };
            if let Some((prev_fork, prev_block)) = last {
                if block < prev_block {
                    violations.push((prev_fork, fork));
                }
            }
            last = Some((fork, block));
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bn(n: u64) -> BlockNumber {
        BlockNumber::new(n)
    }

    #[test]
    fn test_is_active_unset() {
        assert!(!is_active(None, Some(&bn(100))));
        assert!(!is_active(Some(&bn(0)), None));
        assert!(!is_active(None, None));
    }

    #[test]
    fn test_is_active_boundaries() {
        assert!(!is_active(Some(&bn(10)), Some(&bn(9))));
        assert!(is_active(Some(&bn(10)), Some(&bn(10))));
        assert!(is_active(Some(&bn(10)), Some(&bn(11))));
        assert!(is_active(Some(&bn(0)), Some(&bn(0))));
    }

    #[test]
    fn test_axis_table_is_consistent() {
        assert_eq!(Fork::ALL.len(), 23);
        for window in Fork::ALL.windows(2) {
            assert!(window[0] < window[1]);
        }
        for unit in Fork::BYZANTIUM_EIPS {
            assert_eq!(unit.umbrella(), Some(Fork::Byzantium));
        }
        for unit in Fork::CONSTANTINOPLE_EIPS {
            assert_eq!(unit.umbrella(), Some(Fork::Constantinople));
        }
        assert_eq!(Fork::Homestead.constituents(), None);
    }

    #[test]
    fn test_umbrella_threshold_activates_units() {
        let config = ChainConfig {
            byzantium_block: Some(bn(30)),
            ..ChainConfig::default()
        };
        assert!(!config.is_eip211(&bn(29)));
        for unit in Fork::BYZANTIUM_EIPS {
            assert!(config.is_fork_active(unit, &bn(30)), "{unit} inactive");
        }
        assert!(!config.is_eip145(&bn(30)));
    }

    #[test]
    fn test_all_units_activate_umbrella() {
        let mut config = ChainConfig::default();
        for (i, unit) in Fork::CONSTANTINOPLE_EIPS.iter().enumerate() {
            config.set_fork_block(*unit, Some(bn(10 + i as u64)));
        }
        // The last unit lands at 14.
        assert!(!config.is_constantinople(&bn(13)));
        assert!(config.is_constantinople(&bn(14)));
        assert!(config.is_eip145(&bn(13)));
        assert!(!config.is_eip1283(&bn(13)));
    }

    #[test]
    fn test_partial_group_does_not_activate_umbrella() {
        let config = ChainConfig {
            eip100_block: Some(bn(5)),
            eip649_block: Some(bn(5)),
            ..ChainConfig::default()
        };
        assert!(config.is_eip100(&bn(5)));
        assert!(config.is_eip649(&bn(5)));
        assert!(!config.is_eip140(&bn(5)));
        assert!(!config.is_byzantium(&bn(1_000_000)));
    }

    #[test]
    fn test_eip7_follows_homestead() {
        let config = ChainConfig {
            homestead_block: Some(bn(3)),
            ..ChainConfig::default()
        };
        assert!(!config.is_eip7(&bn(2)));
        assert!(config.is_eip7(&bn(3)));

        let config = ChainConfig {
            eip7_block: Some(bn(3)),
            ..ChainConfig::default()
        };
        assert!(config.is_eip7(&bn(3)));
        assert!(!config.is_homestead(&bn(3)));
    }

    #[test]
    fn test_ordering_violations() {
        let config = ChainConfig {
            homestead_block: Some(bn(30)),
            eip150_block: Some(bn(10)),
            byzantium_block: Some(bn(40)),
            ..ChainConfig::default()
        };
        assert_eq!(
            config.ordering_violations(),
            vec![(Fork::Homestead, Fork::Eip150)]
        );

        let config = ChainConfig {
            homestead_block: Some(bn(1)),
            eip150_block: Some(bn(2)),
            ..ChainConfig::default()
        };
        assert!(config.ordering_violations().is_empty());
    }
}
