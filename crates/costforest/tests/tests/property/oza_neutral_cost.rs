//! Property tests: Oza costing is neutral (1.0) for untouched classes and for
//! classes the ensemble mostly gets right.

use costforest_engine::OzaCosting;
use proptest::prelude::*;

proptest! {
    #[test]
    fn untouched_classes_cost_one(
        num_classes in 1usize..6,
        updates in prop::collection::vec(0usize..6, 0..30),
    ) {
        let mut oza = OzaCosting::new(num_classes + 1);
        let untouched = num_classes;
        for (n, label) in updates.iter().enumerate() {
            let label = label % num_classes;
            let mut vote = vec![0.0; num_classes + 1];
            vote[label] = 1.0;
            oza.update(label, &vote, n as u64 + 1);
        }
        prop_assert_eq!(oza.cost(untouched), 1.0);
    }

    #[test]
    fn always_correct_class_costs_one(
        rounds in 1usize..50,
        class in 0usize..3,
    ) {
        let mut oza = OzaCosting::new(3);
        let mut vote = vec![0.0; 3];
        vote[class] = 1.0;
        for n in 0..rounds {
            oza.update(class, &vote, n as u64 + 1);
        }
        prop_assert_eq!(oza.cost(class), 1.0);
    }

    #[test]
    fn cost_is_finite_and_non_negative(
        outcomes in prop::collection::vec(any::<bool>(), 1..80),
    ) {
        let mut oza = OzaCosting::new(2);
        for (n, hit) in outcomes.iter().enumerate() {
            let vote = if *hit { [1.0, 0.0] } else { [0.0, 1.0] };
            oza.update(0, &vote, n as u64 + 1);
        }
        let cost = oza.cost(0);
        prop_assert!(cost.is_finite() && cost >= 0.0, "cost {}", cost);
    }
}
