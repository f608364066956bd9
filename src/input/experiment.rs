use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::input::truth::parse_score;
use crate::input::{InputError, for_each_csv_row};
use crate::model::{RewardQuery, RewardSource, RewardTriple, SourceError};

const DATA_DIR: &str = "data";
const FINAL_FILE: &str = "final.csv";
const ITER_PREFIX: &str = "iter_";

/// A run directory: `data/iter_<k>.csv` holds everything acquired up to
/// iteration `k`, and `data/final.csv` exists once the run finished.
#[derive(Debug, Clone)]
pub struct ExperimentRun {
    id: String,
    num_acquired: Vec<usize>,
    scored: Vec<Vec<(String, f64)>>,
    finished: bool,
}

impl ExperimentRun {
    pub fn load(root: &Path, library: &HashMap<String, usize>) -> Result<Self, InputError> {
        let data_dir = root.join(DATA_DIR);
        if !data_dir.is_dir() {
            return Err(InputError::MissingInput(format!(
                "{} has no {} directory",
                root.display(),
                DATA_DIR
            )));
        }

        let mut iter_files: Vec<(usize, PathBuf)> = Vec::new();
        let mut finished = false;
        for entry in fs::read_dir(&data_dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == FINAL_FILE {
                finished = true;
            } else if let Some(k) = parse_iter_index(name) {
                iter_files.push((k, path));
            }
        }
        if iter_files.is_empty() {
            return Err(InputError::InvalidInput(format!(
                "{} contains no {}<k>.csv files",
                data_dir.display(),
                ITER_PREFIX
            )));
        }
        iter_files.sort_by_key(|(k, _)| *k);

        let mut num_acquired = Vec::with_capacity(iter_files.len());
        let mut scored = Vec::with_capacity(iter_files.len());
        let mut unknown = HashSet::new();
        for (_, path) in &iter_files {
            let (acquired, points) = read_iteration(path, library, &mut unknown)?;
            num_acquired.push(acquired);
            scored.push(points);
        }
        if !unknown.is_empty() {
            crate::warn!(
                "{}: {} acquired identifiers are not in the library and were ignored",
                root.display(),
                unknown.len()
            );
        }

        crate::debug!(
            "loaded {} ({} iterations, finished={})",
            root.display(),
            num_acquired.len(),
            finished
        );

        Ok(Self {
            id: root.display().to_string(),
            num_acquired,
            scored,
            finished,
        })
    }

    /// Best `n` scored acquisitions at `iter`, sign-normalized, descending.
    fn best_found(&self, iter: usize, n: usize, maximize: bool) -> Vec<(&str, f64)> {
        let sign = if maximize { 1.0 } else { -1.0 };
        let mut found: Vec<(&str, f64)> = self.scored[iter]
            .iter()
            .map(|(id, score)| (id.as_str(), sign * score))
            .collect();
        found.sort_by(|a, b| match b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal) {
            Ordering::Equal => a.0.cmp(b.0),
            other => other,
        });
        found.truncate(n);
        found
    }
}

impl RewardSource for ExperimentRun {
    fn id(&self) -> &str {
        &self.id
    }

    fn num_acquired(&self) -> &[usize] {
        &self.num_acquired
    }

    fn compute_reward(
        &self,
        iter: usize,
        query: &RewardQuery<'_>,
    ) -> Result<RewardTriple, SourceError> {
        if iter >= self.num_iters() {
            return Err(SourceError::IterationOutOfRange {
                run: self.id.clone(),
                iter,
                num_iters: self.num_iters(),
            });
        }
        let n = query.true_top_k.len();
        if n == 0 {
            return Err(SourceError::EmptyGroundTruth);
        }

        let found = self.best_found(iter, n, query.maximize);

        let avg = if found.is_empty() {
            f64::NAN
        } else {
            let found_mean = found.iter().map(|(_, s)| s).sum::<f64>() / found.len() as f64;
            if query.as_fraction {
                let true_mean = query.true_top_k.iter().map(|(_, s)| s).sum::<f64>() / n as f64;
                found_mean / true_mean
            } else {
                found_mean
            }
        };

        let true_ids: HashSet<&str> = query.true_top_k.iter().map(|(id, _)| id.as_str()).collect();
        let overlap = found.iter().filter(|(id, _)| true_ids.contains(id)).count();

        let mut missed: HashMap<u64, usize> = HashMap::new();
        for (_, s) in query.true_top_k {
            *missed.entry(score_key(*s)).or_insert(0) += 1;
        }
        let mut recovered = 0usize;
        for (_, s) in &found {
            if let Some(count) = missed.get_mut(&score_key(*s)) {
                if *count > 0 {
                    *count -= 1;
                    recovered += 1;
                }
            }
        }

        let (overlap, score) = if query.as_fraction {
            (overlap as f64 / n as f64, recovered as f64 / n as f64)
        } else {
            (overlap as f64, recovered as f64)
        };
        Ok(RewardTriple::new(avg, overlap, score))
    }

    fn check_complete(&self) -> Result<(), SourceError> {
        if self.finished {
            Ok(())
        } else {
            Err(SourceError::Incomplete {
                run: self.id.clone(),
                iters: self.num_iters(),
            })
        }
    }
}

fn parse_iter_index(name: &str) -> Option<usize> {
    name.strip_prefix(ITER_PREFIX)?
        .strip_suffix(".csv")?
        .parse()
        .ok()
}

/// Exact-match key for a score; `0.0` and `-0.0` compare equal.
fn score_key(v: f64) -> u64 {
    if v == 0.0 { 0f64.to_bits() } else { v.to_bits() }
}

fn read_iteration(
    path: &Path,
    library: &HashMap<String, usize>,
    unknown: &mut HashSet<String>,
) -> Result<(usize, Vec<(String, f64)>), InputError> {
    // A repeated identifier resolves to its last row.
    let mut rows: HashMap<String, Option<f64>> = HashMap::new();
    for_each_csv_row(path, true, |line_no, fields| {
        let Some(id) = fields.first().filter(|id| !id.is_empty()) else {
            return Err(InputError::Parse(format!(
                "{} line {} has no identifier",
                path.display(),
                line_no
            )));
        };
        rows.insert(id.to_string(), fields.get(1).and_then(|s| parse_score(s)));
        Ok(())
    })?;

    let acquired = rows.len();
    let mut points = Vec::with_capacity(rows.len());
    for (id, score) in rows {
        if !library.contains_key(&id) {
            unknown.insert(id);
            continue;
        }
        if let Some(score) = score {
            points.push((id, score));
        }
    }
    points.sort_by(|a, b| a.0.cmp(&b.0));
    Ok((acquired, points))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/experiment.rs"]
mod tests;
