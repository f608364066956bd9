use serde_json::{Value, json};

use crate::model::{MeanStd, RewardKind};
use crate::report::{ReportError, ReportRecord};

pub fn render_record_json(record: &ReportRecord) -> Result<String, ReportError> {
    let mut rewards = serde_json::Map::new();
    for kind in RewardKind::all() {
        rewards.insert(kind.name().to_ascii_lowercase(), stats_value(record.reward(kind)));
    }
    let value = json!({
        "split": record.split(),
        "model": record.model(),
        "metric": record.metric(),
        "top_n": record.top_n(),
        "reps": record.reps(),
        "num_iters": record.num_iters(),
        "num_acquired": record.num_acquired(),
        "rewards": rewards,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn stats_value(stats: &[MeanStd]) -> Value {
    Value::Array(
        stats
            .iter()
            .map(|s| json!({ "mean": s.mean, "std": s.std }))
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
