//! Property tests: the imbalance window's counts always match its contents.

use costforest_engine::ImbalanceWindow;
use proptest::prelude::*;

proptest! {
    #[test]
    fn distribution_sums_to_held_labels(
        capacity in 1usize..40,
        labels in prop::collection::vec(0usize..4, 0..120),
    ) {
        let mut w = ImbalanceWindow::new(capacity);
        for (added, label) in labels.iter().enumerate() {
            w.add_label(*label);
            let total: u64 = w.distribution().iter().sum();
            prop_assert_eq!(total as usize, (added + 1).min(capacity));
        }
    }

    #[test]
    fn counts_match_most_recent_labels(
        capacity in 1usize..40,
        labels in prop::collection::vec(0usize..4, 1..120),
    ) {
        let mut w = ImbalanceWindow::new(capacity);
        for label in &labels {
            w.add_label(*label);
        }
        let start = labels.len().saturating_sub(capacity);
        for class in 0..4 {
            let expected = labels[start..].iter().filter(|l| **l == class).count() as u64;
            prop_assert_eq!(w.count(class), expected);
        }
    }
}
