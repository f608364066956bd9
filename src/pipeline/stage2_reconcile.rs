use crate::model::RewardTensor;
use crate::pipeline::stage1_collect::Stage1Output;

#[derive(Debug, Clone)]
pub struct Stage2Output {
    pub tensor: RewardTensor,
    /// Checkpoints of the last collected run, cut to the retained length.
    pub num_acquired: Vec<usize>,
    pub incomplete: Vec<String>,
    pub truncated_to: Option<usize>,
    /// Runs whose retained checkpoints differ from `num_acquired`.
    pub mismatched: Vec<String>,
}

/// Truncates every run to the shortest one when any run is incomplete.
///
/// Runs are otherwise passed through untouched; equal lengths are then the
/// caller's responsibility and a mismatch surfaces at aggregation.
pub fn run_stage2(collected: Stage1Output) -> Stage2Output {
    let Stage1Output {
        run_ids,
        rewards,
        num_acquired,
        incomplete,
    } = collected;

    let mut tensor = RewardTensor::new(rewards);
    let mut truncated_to = None;

    if !incomplete.is_empty() {
        crate::warn!(
            "There are incomplete experiments! ({})",
            incomplete.join(", ")
        );
        let min_iters = tensor.min_len().unwrap_or(0);
        tensor.truncate(min_iters);
        truncated_to = Some(min_iters);
        crate::warn!(
            "Results for dataset will be truncated to shortest experiment ({}).",
            min_iters
        );
    }

    let mut representative = num_acquired.last().cloned().unwrap_or_default();
    if let Some(len) = truncated_to {
        representative.truncate(len);
    }

    let retained = representative.len();
    let mut mismatched = Vec::new();
    for (run, checkpoints) in run_ids.iter().zip(&num_acquired) {
        let end = retained.min(checkpoints.len());
        if checkpoints[..end] != representative[..end] {
            crate::warn!(
                "{} acquired points on a different schedule than the reported one",
                run
            );
            mismatched.push(run.clone());
        }
    }

    Stage2Output {
        tensor,
        num_acquired: representative,
        incomplete,
        truncated_to,
        mismatched,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_reconcile.rs"]
mod tests;
