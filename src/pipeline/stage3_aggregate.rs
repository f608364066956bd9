use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{MeanStd, RewardKind, RewardTensor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("no replicate runs to aggregate")]
    Empty,
    #[error("replicate {replicate} has {found} iterations, expected {expected}")]
    Ragged {
        replicate: usize,
        expected: usize,
        found: usize,
    },
}

/// Per-iteration mean and spread of each reward across replicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardStats {
    pub reps: usize,
    pub avg: Vec<MeanStd>,
    pub overlap: Vec<MeanStd>,
    pub score: Vec<MeanStd>,
}

impl RewardStats {
    /// Aggregates `[replicate][iteration]` matrices of each reward.
    pub fn from_components(
        raw_avg: &[Vec<f64>],
        raw_overlap: &[Vec<f64>],
        raw_score: &[Vec<f64>],
    ) -> Result<Self, AggregateError> {
        Ok(Self {
            reps: raw_avg.len(),
            avg: mean_std_columns(raw_avg)?,
            overlap: mean_std_columns(raw_overlap)?,
            score: mean_std_columns(raw_score)?,
        })
    }

    pub fn num_iters(&self) -> usize {
        self.avg.len()
    }
}

pub fn run_stage3(tensor: &RewardTensor) -> Result<RewardStats, AggregateError> {
    RewardStats::from_components(
        &tensor.component(RewardKind::Avg),
        &tensor.component(RewardKind::Overlap),
        &tensor.component(RewardKind::Score),
    )
}

/// Reduces `[replicate][iteration]` values over replicates.
///
/// The spread is the population standard deviation (divisor = replicates),
/// so a single replicate always reports 0. NaN inputs propagate.
pub fn mean_std_columns(values: &[Vec<f64>]) -> Result<Vec<MeanStd>, AggregateError> {
    let Some(first) = values.first() else {
        return Err(AggregateError::Empty);
    };
    let n_iters = first.len();
    for (replicate, row) in values.iter().enumerate() {
        if row.len() != n_iters {
            return Err(AggregateError::Ragged {
                replicate,
                expected: n_iters,
                found: row.len(),
            });
        }
    }

    let reps = values.len() as f64;
    let mut out = Vec::with_capacity(n_iters);
    for t in 0..n_iters {
        let mean = values.iter().map(|row| row[t]).sum::<f64>() / reps;
        let var = values
            .iter()
            .map(|row| {
                let d = row[t] - mean;
                d * d
            })
            .sum::<f64>()
            / reps;
        out.push(MeanStd {
            mean,
            std: var.sqrt(),
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_aggregate.rs"]
mod tests;
