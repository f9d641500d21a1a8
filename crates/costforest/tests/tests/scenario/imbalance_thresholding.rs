//! Scenario: a 9:1 binary stream through a three-member forest whose members
//! always vote [0.6, 0.4]. The cost matrix must lift the minority class.

use costforest_engine::{Concurrency, CostSensitiveForest, CostStrategy, ForestConfig, ThresholdMode};
use costforest_tests::{imbalanced_binary, FixedVoteFactory, RecordingFactory};
use costforest_types::votes;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config(mode: ThresholdMode) -> ForestConfig {
    ForestConfig {
        ensemble_size: 3,
        window_size: 100,
        threshold_mode: mode,
        cost_strategy: CostStrategy::Picek,
        concurrency: Concurrency::Sequential,
        ..Default::default()
    }
}

fn trained_forest(mode: ThresholdMode, instances: usize) -> CostSensitiveForest {
    let mut forest = CostSensitiveForest::builder(config(mode))
        .model_factory(FixedVoteFactory {
            votes: vec![0.6, 0.4],
        })
        .build()
        .unwrap();
    for inst in imbalanced_binary(instances, 10, 7) {
        forest.train(&inst).unwrap();
    }
    forest
}

fn minority_instance() -> costforest_types::Instance {
    let mut xs = imbalanced_binary(10, 10, 99);
    let inst = xs.pop().unwrap();
    assert_eq!(inst.class_label, 1);
    inst
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn global_threshold_lifts_minority_vote() {
    let mut forest = trained_forest(ThresholdMode::Global, 100);
    assert_eq!(forest.class_distribution(), Some(&[90u64, 10][..]));

    let inst = minority_instance();
    let mut raw = forest.sub_models()[0].predict(&inst);
    votes::normalize(&mut raw);
    let out = forest.predict(&inst).unwrap();

    let multiplier = out[1] / raw[1];
    assert!(multiplier > 1.0, "minority multiplier {multiplier}");
    // costs are 100/180 and 5: [0.6 · 5/9, 0.4 · 5] normalized
    assert!((out[1] - 6.0 / 7.0).abs() < 1e-9);
    assert_eq!(votes::max_index(&out), Some(1));
}

#[test]
fn local_threshold_matches_global_for_identical_members() {
    let inst = minority_instance();
    let global = trained_forest(ThresholdMode::Global, 100)
        .predict(&inst)
        .unwrap();
    let local = trained_forest(ThresholdMode::Local, 100)
        .predict(&inst)
        .unwrap();
    for (g, l) in global.iter().zip(&local) {
        assert!((g - l).abs() < 1e-9);
    }
}

#[test]
fn disabled_and_training_modes_leave_prediction_raw() {
    let inst = minority_instance();
    for mode in [ThresholdMode::Disabled, ThresholdMode::Training] {
        let out = trained_forest(mode, 100).predict(&inst).unwrap();
        assert!((out[0] - 0.6).abs() < 1e-9, "{mode:?}: {out:?}");
        assert!((out[1] - 0.4).abs() < 1e-9, "{mode:?}: {out:?}");
    }
}

#[test]
fn window_keeps_only_recent_labels() {
    let forest = trained_forest(ThresholdMode::Global, 250);
    let dist = forest.class_distribution().unwrap();
    assert_eq!(dist.iter().sum::<u64>(), 100);
    assert_eq!(dist, &[90, 10]);
}

#[test]
fn minority_instances_always_train_every_member() {
    let cfg = ForestConfig {
        lambda: 0.01,
        drift_detection: false,
        ..config(ThresholdMode::Global)
    };
    let recorder = RecordingFactory::new();
    let mut forest = CostSensitiveForest::builder(cfg)
        .model_factory(recorder.clone())
        .build()
        .unwrap();
    for inst in imbalanced_binary(50, 10, 3) {
        forest.train(&inst).unwrap();
    }
    assert_eq!(forest.class_distribution(), Some(&[45u64, 5][..]));
    // Nearly every Poisson(0.01) draw is zero, so training is dominated by
    // the five forced minority instances.
    for member in 0..3 {
        let weights = recorder.weights(member);
        assert!(weights.len() >= 5, "member {member}: {weights:?}");
        assert!(weights.len() < 20, "member {member}: {weights:?}");
        assert!(weights.iter().all(|w| *w >= 1.0));
    }
}

fn member_metric(mode: ThresholdMode) -> f64 {
    let cfg = ForestConfig {
        drift_detection: false,
        ..config(mode)
    };
    let mut forest = CostSensitiveForest::builder(cfg)
        .model_factory(FixedVoteFactory {
            votes: vec![0.6, 0.4],
        })
        .build()
        .unwrap();
    for inst in imbalanced_binary(100, 10, 7) {
        forest.train(&inst).unwrap();
    }
    forest.measurements().members[0].metric.unwrap()
}

#[test]
fn training_threshold_reaches_member_evaluators() {
    // Raw votes always pick class 0: F1 is 1.8/1.9 for class 0 and 0 for class 1.
    let disabled = member_metric(ThresholdMode::Disabled);
    assert!((disabled - 0.9 / 1.9).abs() < 1e-9, "disabled {disabled}");

    // Costed votes always pick class 1, which holds 10 of the 100 labels.
    let training = member_metric(ThresholdMode::Training);
    assert!((training - 0.1 / 1.1).abs() < 1e-9, "training {training}");
}
