use thiserror::Error;

use crate::model::reward::RewardTriple;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("incomplete experiment: {run} ({iters} iterations found)")]
    Incomplete { run: String, iters: usize },
    #[error("iteration {iter} out of range for {run} ({num_iters} iterations)")]
    IterationOutOfRange {
        run: String,
        iter: usize,
        num_iters: usize,
    },
    #[error("ground truth top-N set is empty")]
    EmptyGroundTruth,
}

/// Ground truth and conventions shared by every reward computation of a collection.
#[derive(Debug, Clone, Copy)]
pub struct RewardQuery<'a> {
    /// True top-N `(identifier, score)` pairs, sorted descending.
    pub true_top_k: &'a [(String, f64)],
    pub maximize: bool,
    pub as_fraction: bool,
}

/// One replicate run of the acquisition process.
pub trait RewardSource {
    fn id(&self) -> &str;

    fn num_acquired(&self) -> &[usize];

    fn num_iters(&self) -> usize {
        self.num_acquired().len()
    }

    fn compute_reward(
        &self,
        iter: usize,
        query: &RewardQuery<'_>,
    ) -> Result<RewardTriple, SourceError>;

    /// Fails with `SourceError::Incomplete` when the run did not finish.
    fn check_complete(&self) -> Result<(), SourceError>;
}
