use thiserror::Error;

use crate::model::{RewardQuery, RewardSource, RewardTriple, SourceError};

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("no experiments to collect")]
    NoSources,
    #[error("reward computation failed for {run} at iteration {iter}: {source}")]
    Reward {
        run: String,
        iter: usize,
        #[source]
        source: SourceError,
    },
    #[error("completeness check failed for {run}: {source}")]
    Completeness {
        run: String,
        #[source]
        source: SourceError,
    },
}

/// Per-run rewards as collected, before lengths are reconciled.
#[derive(Debug, Clone)]
pub struct Stage1Output {
    pub run_ids: Vec<String>,
    pub rewards: Vec<Vec<RewardTriple>>,
    pub num_acquired: Vec<Vec<usize>>,
    pub incomplete: Vec<String>,
}

pub fn run_stage1(
    sources: &[Box<dyn RewardSource>],
    true_top_k: &[(String, f64)],
    maximize: bool,
) -> Result<Stage1Output, CollectError> {
    if sources.is_empty() {
        return Err(CollectError::NoSources);
    }
    let query = RewardQuery {
        true_top_k,
        maximize,
        as_fraction: true,
    };

    let mut out = Stage1Output {
        run_ids: Vec::with_capacity(sources.len()),
        rewards: Vec::with_capacity(sources.len()),
        num_acquired: Vec::with_capacity(sources.len()),
        incomplete: Vec::new(),
    };

    for source in sources {
        let run = source.id().to_string();
        let mut rewards = Vec::with_capacity(source.num_iters());
        for iter in 0..source.num_iters() {
            let triple = source
                .compute_reward(iter, &query)
                .map_err(|source| CollectError::Reward {
                    run: run.clone(),
                    iter,
                    source,
                })?;
            rewards.push(triple);
        }

        match source.check_complete() {
            Ok(()) => {}
            Err(SourceError::Incomplete { .. }) => out.incomplete.push(run.clone()),
            Err(source) => return Err(CollectError::Completeness { run, source }),
        }

        crate::debug!("collected {} iterations from {}", rewards.len(), run);
        out.rewards.push(rewards);
        out.num_acquired.push(source.num_acquired().to_vec());
        out.run_ids.push(run);
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_collect.rs"]
mod tests;
