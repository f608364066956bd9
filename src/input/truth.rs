use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use crate::input::{InputError, for_each_csv_row};

/// Ground-truth scores, sign-normalized so that higher is always better.
#[derive(Debug, Clone, Default)]
pub struct TruthScores {
    pub scores: HashMap<String, f64>,
}

impl TruthScores {
    /// The `n` best entries, descending by score with ties broken by identifier.
    pub fn top_k(&self, n: usize) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .scores
            .iter()
            .map(|(id, &score)| (id.clone(), score))
            .collect();
        entries.sort_by(|a, b| match b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        entries.truncate(n);
        entries
    }
}

pub fn load_truth(
    path: &Path,
    id_col: usize,
    score_col: usize,
    title_line: bool,
    maximize: bool,
) -> Result<TruthScores, InputError> {
    let sign = if maximize { 1.0 } else { -1.0 };
    let mut scores = HashMap::new();
    let mut skipped = 0usize;

    for_each_csv_row(path, title_line, |line_no, fields| {
        let Some(id) = fields.get(id_col) else {
            return Err(InputError::Parse(format!(
                "ground truth line {} has no identifier column {}",
                line_no, id_col
            )));
        };
        match fields.get(score_col).and_then(|s| parse_score(s)) {
            Some(score) => {
                scores.insert(id.to_string(), sign * score);
            }
            None => skipped += 1,
        }
        Ok(())
    })?;

    if skipped > 0 {
        crate::debug!(
            "skipped {} ground truth rows without a usable score in {}",
            skipped,
            path.display()
        );
    }
    if scores.is_empty() {
        return Err(InputError::Parse(format!(
            "ground truth {} contains no scored identifiers",
            path.display()
        )));
    }
    Ok(TruthScores { scores })
}

/// Parses a score field; empty, `None` and non-finite values count as missing.
pub fn parse_score(field: &str) -> Option<f64> {
    let v = field.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
