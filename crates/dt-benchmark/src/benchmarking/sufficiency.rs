use serde::{Deserialize, Serialize};

use super::domain::DataInventory;
use super::scoring::SufficiencyThresholds;

/// Readiness tier derived from how many records a project holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSufficiency {
    None,
    Minimal,
    Partial,
    Substantial,
    Complete,
}

impl DataSufficiency {
    pub fn from_total(total: u64, thresholds: &SufficiencyThresholds) -> Self {
        if total >= thresholds.complete {
            Self::Complete
        } else if total >= thresholds.substantial {
            Self::Substantial
        } else if total >= thresholds.partial {
            Self::Partial
        } else if total >= thresholds.minimal && total > 0 {
            Self::Minimal
        } else {
            Self::None
        }
    }

    pub const fn percent(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Minimal => 25,
            Self::Partial => 50,
            Self::Substantial => 75,
            Self::Complete => 100,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Insufficient Data",
            Self::Minimal => "Limited Data",
            Self::Partial => "Moderate Data",
            Self::Substantial => "Good Data",
            Self::Complete => "Comprehensive Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SufficiencyReport {
    pub inventory: DataInventory,
    pub total: u64,
    pub tier: DataSufficiency,
    pub percent: u8,
}

pub fn assess(
    inventory: DataInventory,
    thresholds: &SufficiencyThresholds,
) -> SufficiencyReport {
    let total = inventory.total();
    let tier = DataSufficiency::from_total(total, thresholds);
    SufficiencyReport {
        inventory,
        total,
        tier,
        percent: tier.percent(),
    }
}
