use super::*;
use crate::model::{RewardKind, RewardTriple};

fn run_rewards(len: usize, base: f64) -> Vec<RewardTriple> {
    (0..len)
        .map(|i| RewardTriple::new(base + i as f64, 0.0, 0.0))
        .collect()
}

fn collected(lengths: &[usize], incomplete: &[&str]) -> Stage1Output {
    Stage1Output {
        run_ids: (0..lengths.len()).map(|i| format!("r{}", i)).collect(),
        rewards: lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| run_rewards(len, i as f64 * 100.0))
            .collect(),
        num_acquired: lengths
            .iter()
            .map(|&len| (1..=len).map(|k| k * 10).collect())
            .collect(),
        incomplete: incomplete.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_truncates_all_runs_to_shortest_when_any_incomplete() {
    let out = run_stage2(collected(&[5, 7, 6], &["r1"]));
    assert_eq!(out.truncated_to, Some(5));
    assert_eq!(out.tensor.reps(), 3);
    assert_eq!(out.tensor.min_len(), Some(5));
    for row in out.tensor.component(RewardKind::Avg) {
        assert_eq!(row.len(), 5);
    }
    assert_eq!(out.num_acquired, vec![10, 20, 30, 40, 50]);
    assert_eq!(out.incomplete, vec!["r1".to_string()]);
}

#[test]
fn test_truncation_keeps_leading_iterations() {
    let out = run_stage2(collected(&[3, 2], &["r1"]));
    let avg = out.tensor.component(RewardKind::Avg);
    assert_eq!(avg, vec![vec![0.0, 1.0], vec![100.0, 101.0]]);
}

#[test]
fn test_no_truncation_when_all_complete() {
    let out = run_stage2(collected(&[4, 4, 4], &[]));
    assert_eq!(out.truncated_to, None);
    assert_eq!(out.tensor.min_len(), Some(4));
    assert_eq!(out.num_acquired.len(), 4);
}

#[test]
fn test_ragged_complete_runs_pass_through() {
    let out = run_stage2(collected(&[4, 3], &[]));
    assert_eq!(out.truncated_to, None);
    let avg = out.tensor.component(RewardKind::Avg);
    assert_eq!(avg[0].len(), 4);
    assert_eq!(avg[1].len(), 3);
}

#[test]
fn test_representative_checkpoints_come_from_last_run() {
    let mut input = collected(&[3, 3], &[]);
    input.num_acquired[1] = vec![5, 15, 25];
    let out = run_stage2(input);
    assert_eq!(out.num_acquired, vec![5, 15, 25]);
    assert_eq!(out.mismatched, vec!["r0".to_string()]);
}

#[test]
fn test_shared_checkpoints_are_not_flagged() {
    let out = run_stage2(collected(&[5, 7, 6], &["r1"]));
    assert!(out.mismatched.is_empty());
}

#[test]
fn test_mismatch_checked_on_retained_prefix_only() {
    let mut input = collected(&[4, 2], &["r1"]);
    input.num_acquired[0] = vec![10, 20, 99, 99];
    let out = run_stage2(input);
    assert_eq!(out.num_acquired, vec![10, 20]);
    assert!(out.mismatched.is_empty());

    let mut input = collected(&[4, 2], &["r1"]);
    input.num_acquired[0] = vec![10, 21, 30, 40];
    assert_eq!(run_stage2(input).mismatched, vec!["r0".to_string()]);
}
