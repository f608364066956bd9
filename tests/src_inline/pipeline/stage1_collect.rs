use super::*;

struct FakeSource {
    id: String,
    num_acquired: Vec<usize>,
    complete: bool,
    fail_at: Option<usize>,
}

impl FakeSource {
    fn new(id: &str, len: usize, complete: bool) -> Self {
        Self {
            id: id.to_string(),
            num_acquired: (1..=len).map(|i| i * 10).collect(),
            complete,
            fail_at: None,
        }
    }
}

impl RewardSource for FakeSource {
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
        assert!(query.as_fraction);
        if self.fail_at == Some(iter) {
            return Err(SourceError::IterationOutOfRange {
                run: self.id.clone(),
                iter,
                num_iters: self.num_iters(),
            });
        }
        let v = iter as f64 / 10.0;
        let sign = if query.maximize { 1.0 } else { -1.0 };
        Ok(RewardTriple::new(sign * v, v, query.true_top_k.len() as f64))
    }

    fn check_complete(&self) -> Result<(), SourceError> {
        if self.complete {
            Ok(())
        } else {
            Err(SourceError::Incomplete {
                run: self.id.clone(),
                iters: self.num_iters(),
            })
        }
    }
}

fn boxed(sources: Vec<FakeSource>) -> Vec<Box<dyn RewardSource>> {
    sources
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn RewardSource>)
        .collect()
}

fn top() -> Vec<(String, f64)> {
    vec![("x".to_string(), 1.0), ("y".to_string(), 0.5)]
}

#[test]
fn test_collects_every_iteration_of_every_run() {
    let sources = boxed(vec![
        FakeSource::new("r1", 3, true),
        FakeSource::new("r2", 3, true),
    ]);
    let out = run_stage1(&sources, &top(), true).unwrap();
    assert_eq!(out.run_ids, vec!["r1".to_string(), "r2".to_string()]);
    assert_eq!(out.rewards.len(), 2);
    assert_eq!(out.rewards[1].len(), 3);
    assert_eq!(out.rewards[0][2], RewardTriple::new(0.2, 0.2, 2.0));
    assert_eq!(out.num_acquired[0], vec![10, 20, 30]);
    assert!(out.incomplete.is_empty());
}

#[test]
fn test_maximize_flag_reaches_sources() {
    let sources = boxed(vec![FakeSource::new("r1", 2, true)]);
    let out = run_stage1(&sources, &top(), false).unwrap();
    assert_eq!(out.rewards[0][1].avg, -0.1);
}

#[test]
fn test_incomplete_runs_are_recorded_and_kept() {
    let sources = boxed(vec![
        FakeSource::new("r1", 5, true),
        FakeSource::new("r2", 2, false),
    ]);
    let out = run_stage1(&sources, &top(), true).unwrap();
    assert_eq!(out.incomplete, vec!["r2".to_string()]);
    assert_eq!(out.rewards[1].len(), 2);
}

#[test]
fn test_reward_failure_aborts_collection() {
    let mut bad = FakeSource::new("bad", 4, true);
    bad.fail_at = Some(2);
    let sources = boxed(vec![FakeSource::new("ok", 4, true), bad]);
    let err = run_stage1(&sources, &top(), true).unwrap_err();
    match err {
        CollectError::Reward { run, iter, .. } => {
            assert_eq!(run, "bad");
            assert_eq!(iter, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_no_sources() {
    let sources: Vec<Box<dyn RewardSource>> = Vec::new();
    assert!(matches!(
        run_stage1(&sources, &top(), true),
        Err(CollectError::NoSources)
    ));
}
