use crate::model::reward::{RewardKind, RewardTriple};

/// Rewards indexed as `[replicate][iteration]`. May be ragged until reconciled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardTensor {
    rows: Vec<Vec<RewardTriple>>,
}

impl RewardTensor {
    pub fn new(rows: Vec<Vec<RewardTriple>>) -> Self {
        Self { rows }
    }

    pub fn reps(&self) -> usize {
        self.rows.len()
    }

    pub fn min_len(&self) -> Option<usize> {
        self.rows.iter().map(|r| r.len()).min()
    }

    /// Drops every iteration at or past `len`.
    pub fn truncate(&mut self, len: usize) {
        for row in &mut self.rows {
            row.truncate(len);
        }
    }

    /// One reward component as a `[replicate][iteration]` matrix.
    pub fn component(&self, kind: RewardKind) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|t| t.get(kind)).collect())
            .collect()
    }
}
