use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rewards of one run at one iteration against the true top-N set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardTriple {
    pub avg: f64,
    pub overlap: f64,
    pub score: f64,
}

impl RewardTriple {
    pub fn new(avg: f64, overlap: f64, score: f64) -> Self {
        Self {
            avg,
            overlap,
            score,
        }
    }

    pub fn get(&self, kind: RewardKind) -> f64 {
        match kind {
            RewardKind::Avg => self.avg,
            RewardKind::Overlap => self.overlap,
            RewardKind::Score => self.score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardKind {
    Avg,
    Overlap,
    Score,
}

impl RewardKind {
    pub fn all() -> [RewardKind; 3] {
        [RewardKind::Avg, RewardKind::Overlap, RewardKind::Score]
    }

    /// Name accepted by the lookup, in its canonical upper-case form.
    pub fn name(self) -> &'static str {
        match self {
            RewardKind::Avg => "AVG",
            RewardKind::Overlap => "SMILES",
            RewardKind::Score => "SCORES",
        }
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid reward! got: {0}")]
pub struct InvalidRewardName(pub String);

impl FromStr for RewardKind {
    type Err = InvalidRewardName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVG" => Ok(RewardKind::Avg),
            "SCORES" => Ok(RewardKind::Score),
            "SMILES" => Ok(RewardKind::Overlap),
            _ => Err(InvalidRewardName(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/reward.rs"]
mod tests;
