use crate::model::MeanStd;
use crate::report::ReportRecord;

const POINTS_LABEL: &str = "Points acquired";
const LABEL_WIDTH: usize = POINTS_LABEL.len() + 2;

pub fn render_record_text(record: &ReportRecord) -> String {
    let header = format!(
        "| {} | {} | {} | TOP-{} |",
        format_percent(record.split(), 1),
        record.model().to_uppercase(),
        record.metric().to_uppercase(),
        record.top_n()
    );
    let border = format!("+{}+", "-".repeat(header.chars().count() - 2));

    let points = record
        .num_acquired()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let lines = [
        border.clone(),
        header,
        border,
        format_row(POINTS_LABEL, &points),
        format_row("Average", &format_reward_row(record.avg_stats(), 2)),
        format_row("SMILES", &format_reward_row(record.overlap_stats(), 1)),
        format_row("Scores", &format_reward_row(record.score_stats(), 1)),
    ];
    lines.join("\n")
}

fn format_row(label: &str, body: &str) -> String {
    format!("{:>width$}: {}", label, body, width = LABEL_WIDTH)
}

/// `mean% (std%)` pairs, comma-joined.
pub fn format_reward_row(stats: &[MeanStd], precision: usize) -> String {
    stats
        .iter()
        .map(|s| {
            format!(
                "{} ({})",
                format_percent(s.mean, precision),
                format_percent(s.std, precision)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Non-finite values print as `nan%`, `inf%` and `-inf%`.
pub fn format_percent(v: f64, precision: usize) -> String {
    if v.is_nan() {
        "nan%".to_string()
    } else {
        format!("{:.*}%", precision, v * 100.0)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
