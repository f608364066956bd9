use proptest::prelude::*;

use super::*;
use crate::model::RewardTriple;

fn tensor_from(avg: &[Vec<f64>]) -> RewardTensor {
    RewardTensor::new(
        avg.iter()
            .map(|row| {
                row.iter()
                    .map(|&v| RewardTriple::new(v, v / 2.0, 1.0 - v))
                    .collect()
            })
            .collect(),
    )
}

#[test]
fn test_three_replicates_four_iterations() {
    let avg = vec![
        vec![0.50, 0.55, 0.60, 0.70],
        vec![0.60, 0.65, 0.70, 0.80],
        vec![0.40, 0.45, 0.50, 0.60],
    ];
    let stats = run_stage3(&tensor_from(&avg)).unwrap();
    assert_eq!(stats.reps, 3);
    assert_eq!(stats.num_iters(), 4);
    assert_eq!(stats.overlap.len(), 4);
    assert_eq!(stats.score.len(), 4);

    assert!((stats.avg[0].mean - 0.50).abs() < 1e-9);
    assert!((stats.avg[0].std - 0.081_649_658_092_772_6).abs() < 1e-9);
    assert!((stats.avg[3].mean - 0.70).abs() < 1e-9);
    assert!((stats.overlap[0].mean - 0.25).abs() < 1e-9);
    assert!((stats.score[0].mean - 0.50).abs() < 1e-9);
}

#[test]
fn test_single_replicate_has_zero_spread() {
    let stats = mean_std_columns(&[vec![0.3, 0.9, 0.1]]).unwrap();
    assert_eq!(stats.len(), 3);
    for (s, v) in stats.iter().zip([0.3, 0.9, 0.1]) {
        assert_eq!(s.mean, v);
        assert_eq!(s.std, 0.0);
    }
}

#[test]
fn test_population_not_sample_deviation() {
    let stats = mean_std_columns(&[vec![0.0], vec![1.0]]).unwrap();
    assert_eq!(stats[0].mean, 0.5);
    assert_eq!(stats[0].std, 0.5);
}

#[test]
fn test_nan_propagates() {
    let stats = mean_std_columns(&[vec![f64::NAN, 0.2], vec![0.1, 0.4]]).unwrap();
    assert!(stats[0].mean.is_nan());
    assert!((stats[1].mean - 0.3).abs() < 1e-12);
}

#[test]
fn test_ragged_and_empty_input_rejected() {
    assert_eq!(mean_std_columns(&[]), Err(AggregateError::Empty));
    assert_eq!(
        mean_std_columns(&[vec![0.1, 0.2], vec![0.1]]),
        Err(AggregateError::Ragged {
            replicate: 1,
            expected: 2,
            found: 1,
        })
    );
    let ragged = RewardTensor::new(vec![vec![RewardTriple::new(0.0, 0.0, 0.0)], vec![]]);
    assert!(run_stage3(&ragged).is_err());
}

#[test]
fn test_from_components_counts_replicates() {
    let raw = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
    let stats = RewardStats::from_components(&raw, &raw, &raw).unwrap();
    assert_eq!(stats.reps, 2);
    assert_eq!(stats.avg, stats.score);
    assert_eq!(raw, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
}

fn matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..6, 1usize..8).prop_flat_map(|(reps, iters)| {
        prop::collection::vec(prop::collection::vec(0.0f64..=1.0, iters), reps)
    })
}

proptest! {
    #[test]
    fn prop_one_pair_per_iteration(values in matrix()) {
        let stats = mean_std_columns(&values).unwrap();
        prop_assert_eq!(stats.len(), values[0].len());
    }

    #[test]
    fn prop_mean_and_population_std(values in matrix()) {
        let stats = mean_std_columns(&values).unwrap();
        let reps = values.len() as f64;
        for (t, s) in stats.iter().enumerate() {
            let column: Vec<f64> = values.iter().map(|row| row[t]).collect();
            let mean = column.iter().sum::<f64>() / reps;
            let mean_sq = column.iter().map(|v| v * v).sum::<f64>() / reps;
            let var = (mean_sq - mean * mean).max(0.0);
            prop_assert!((s.mean - mean).abs() < 1e-9);
            prop_assert!((s.std * s.std - var).abs() < 1e-9);
            prop_assert!(s.std >= 0.0);
            if values.len() == 1 {
                prop_assert_eq!(s.std, 0.0);
            }
        }
    }
}
