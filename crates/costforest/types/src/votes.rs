//! Helpers over class-probability vectors.
//!
//! A vote is a `[f64]` indexed by class. Members with no opinion yet
//! return an all-zero vote, which every helper here leaves untouched.

/// Sum of all entries.
pub fn sum(votes: &[f64]) -> f64 {
    votes.iter().sum()
}

/// True when the vote carries no opinion (sums to zero or less).
pub fn is_empty_vote(votes: &[f64]) -> bool {
    !(sum(votes) > 0.0)
}

/// Scale the vote so it sums to 1. A zero or non-finite sum leaves it unchanged.
pub fn normalize(votes: &mut [f64]) {
    let total = sum(votes);
    if total > 0.0 && total.is_finite() {
        for v in votes.iter_mut() {
            *v /= total;
        }
    }
}

/// Index of the largest entry; ties go to the lowest index.
pub fn max_index<T: PartialOrd + Copy>(values: &[T]) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if !(v > b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the smallest entry; ties go to the lowest index.
pub fn min_index<T: PartialOrd + Copy>(values: &[T]) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if !(v < b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Add `other` into `acc`, growing `acc` if `other` is longer.
pub fn add_into(acc: &mut Vec<f64>, other: &[f64]) {
    if acc.len() < other.len() {
        acc.resize(other.len(), 0.0);
    }
    for (a, o) in acc.iter_mut().zip(other) {
        *a += o;
    }
}
