use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::reward::InvalidRewardName;
use crate::model::{MeanStd, RewardKind};
use crate::pipeline::stage3_aggregate::RewardStats;

pub mod json;
pub mod store;
pub mod text;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    InvalidReward(#[from] InvalidRewardName),
    #[error("{num_acquired} checkpoints reported for {num_iters} aggregated iterations")]
    LengthMismatch { num_acquired: usize, num_iters: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode record: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode record: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("not a report record: {0}")]
    BadHeader(String),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Describes which experiment family a record summarizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Fraction of the library acquired at initialization.
    pub split: f64,
    pub model: String,
    pub metric: String,
    /// Size of the ground-truth top-N set.
    pub top_n: usize,
}

/// Aggregated rewards of replicate runs. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    split: f64,
    model: String,
    metric: String,
    top_n: usize,
    num_acquired: Vec<usize>,
    reps: usize,
    num_iters: usize,
    avg_stats: Vec<MeanStd>,
    overlap_stats: Vec<MeanStd>,
    score_stats: Vec<MeanStd>,
}

impl ReportRecord {
    pub fn new(
        meta: RecordMeta,
        num_acquired: Vec<usize>,
        stats: RewardStats,
    ) -> Result<Self, ReportError> {
        if stats.num_iters() != num_acquired.len() {
            return Err(ReportError::LengthMismatch {
                num_acquired: num_acquired.len(),
                num_iters: stats.num_iters(),
            });
        }
        let RecordMeta {
            split,
            model,
            metric,
            top_n,
        } = meta;
        let RewardStats {
            reps,
            avg,
            overlap,
            score,
        } = stats;
        Ok(Self {
            split,
            model,
            metric,
            top_n,
            num_iters: num_acquired.len(),
            num_acquired,
            reps,
            avg_stats: avg,
            overlap_stats: overlap,
            score_stats: score,
        })
    }

    pub fn split(&self) -> f64 {
        self.split
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn num_acquired(&self) -> &[usize] {
        &self.num_acquired
    }

    pub fn reps(&self) -> usize {
        self.reps
    }

    pub fn num_iters(&self) -> usize {
        self.num_iters
    }

    pub fn avg_stats(&self) -> &[MeanStd] {
        &self.avg_stats
    }

    pub fn overlap_stats(&self) -> &[MeanStd] {
        &self.overlap_stats
    }

    pub fn score_stats(&self) -> &[MeanStd] {
        &self.score_stats
    }

    pub fn reward(&self, kind: RewardKind) -> &[MeanStd] {
        match kind {
            RewardKind::Avg => &self.avg_stats,
            RewardKind::Overlap => &self.overlap_stats,
            RewardKind::Score => &self.score_stats,
        }
    }

    /// Looks up a table by name: `AVG`, `SCORES` or `SMILES`, any case.
    pub fn get_reward(&self, name: &str) -> Result<&[MeanStd], ReportError> {
        let kind: RewardKind = name.parse()?;
        Ok(self.reward(kind))
    }
}

impl fmt::Display for ReportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&text::render_record_text(self))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
