//! Scenario: two members with opposite fixed votes. The combined vote is
//! their average weighted by each member's F1, with an undefined or zero
//! metric counting as weight one.

use costforest_engine::{Concurrency, CostSensitiveForest, ForestConfig, ThresholdMode};
use costforest_tests::{imbalanced_binary, PerMemberVoteFactory};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CLASS_0_VOTER: [f64; 2] = [0.8, 0.2];
const CLASS_1_VOTER: [f64; 2] = [0.3, 0.7];

fn forest() -> CostSensitiveForest {
    let cfg = ForestConfig {
        ensemble_size: 2,
        window_size: 100,
        threshold_mode: ThresholdMode::Disabled,
        drift_detection: false,
        concurrency: Concurrency::Sequential,
        ..Default::default()
    };
    CostSensitiveForest::builder(cfg)
        .model_factory(PerMemberVoteFactory {
            votes: vec![CLASS_0_VOTER.to_vec(), CLASS_1_VOTER.to_vec()],
        })
        .build()
        .unwrap()
}

fn weighted(w0: f64, w1: f64) -> [f64; 2] {
    let total = w0 + w1;
    [
        (w0 * CLASS_0_VOTER[0] + w1 * CLASS_1_VOTER[0]) / total,
        (w0 * CLASS_0_VOTER[1] + w1 * CLASS_1_VOTER[1]) / total,
    ]
}

fn assert_vote(actual: &[f64], expected: [f64; 2]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn undefined_metrics_vote_unweighted() {
    let mut forest = forest();
    let inst = imbalanced_binary(1, 10, 1).remove(0);
    let out = forest.predict(&inst).unwrap();
    assert!(forest.measurements().members.iter().all(|m| m.metric.is_none()));
    assert_vote(&out, weighted(1.0, 1.0));
}

#[test]
fn votes_are_weighted_by_member_f1() {
    let mut forest = forest();
    let data = imbalanced_binary(10, 10, 1);
    for inst in &data {
        forest.train(inst).unwrap();
    }

    // Member 0 always says class 0, member 1 always says class 1, on a 9:1 stream.
    let f1_0 = 0.9 / 1.9;
    let f1_1 = 0.1 / 1.1;
    let metrics: Vec<f64> = forest
        .measurements()
        .members
        .iter()
        .map(|m| m.metric.unwrap())
        .collect();
    assert!((metrics[0] - f1_0).abs() < 1e-9, "{metrics:?}");
    assert!((metrics[1] - f1_1).abs() < 1e-9, "{metrics:?}");

    let out = forest.predict(&data[0]).unwrap();
    assert_vote(&out, weighted(f1_0, f1_1));
    assert!(out[0] > 0.7, "{out:?}");
}

#[test]
fn zero_metric_counts_as_weight_one() {
    let mut forest = forest();
    let data = imbalanced_binary(10, 0, 2);
    for inst in &data {
        forest.train(inst).unwrap();
    }

    let metrics: Vec<Option<f64>> = forest
        .measurements()
        .members
        .iter()
        .map(|m| m.metric)
        .collect();
    assert_eq!(metrics, vec![Some(1.0), Some(0.0)]);

    let out = forest.predict(&data[0]).unwrap();
    assert_vote(&out, weighted(1.0, 1.0));
}
