//! Property tests: ensemble votes are all zero or a probability vector, in
//! every threshold mode.

use costforest_engine::{
    Concurrency, CostSensitiveForest, CostStrategy, ForestConfig, ThresholdMode,
};
use costforest_tests::FixedVoteFactory;
use costforest_types::Instance;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_mode() -> impl Strategy<Value = ThresholdMode> {
    prop_oneof![
        Just(ThresholdMode::Training),
        Just(ThresholdMode::Local),
        Just(ThresholdMode::Global),
        Just(ThresholdMode::Disabled),
    ]
}

fn arb_strategy() -> impl Strategy<Value = CostStrategy> {
    prop_oneof![Just(CostStrategy::Picek), Just(CostStrategy::OzaCosting)]
}

fn config(mode: ThresholdMode, strategy: CostStrategy) -> ForestConfig {
    ForestConfig {
        ensemble_size: 3,
        window_size: 30,
        threshold_mode: mode,
        cost_strategy: strategy,
        concurrency: Concurrency::Sequential,
        ..Default::default()
    }
}

fn check_shape(vote: &[f64]) -> Result<(), TestCaseError> {
    prop_assert!(vote.iter().all(|v| *v >= 0.0), "negative entry in {:?}", vote);
    let sum: f64 = vote.iter().sum();
    prop_assert!(
        sum == 0.0 || (sum - 1.0).abs() < 1e-9,
        "sum {} of {:?}",
        sum,
        vote
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fixed_votes_stay_normalized(
        mode in arb_mode(),
        strategy in arb_strategy(),
        member_vote in prop::collection::vec(0.0f64..5.0, 2),
        labels in prop::collection::vec(0usize..2, 1..60),
    ) {
        let mut forest = CostSensitiveForest::builder(config(mode, strategy))
            .model_factory(FixedVoteFactory { votes: member_vote })
            .build()
            .unwrap();
        for (i, label) in labels.iter().enumerate() {
            let inst = Instance::new(vec![i as f64, 1.0], *label, 2).unwrap();
            check_shape(&forest.predict(&inst).unwrap())?;
            forest.train(&inst).unwrap();
        }
    }

    #[test]
    fn learned_votes_stay_normalized(
        mode in arb_mode(),
        strategy in arb_strategy(),
        rows in prop::collection::vec(
            (prop::collection::vec(-10.0f64..10.0, 3), 0usize..3),
            1..50,
        ),
    ) {
        let mut forest = CostSensitiveForest::new(config(mode, strategy)).unwrap();
        for (features, label) in rows {
            let inst = Instance::new(features, label, 3).unwrap();
            check_shape(&forest.predict(&inst).unwrap())?;
            forest.train(&inst).unwrap();
        }
    }
}
