use costforest_types::votes;
use std::collections::VecDeque;

/// Bounded FIFO of recent class labels with a running per-class count.
///
/// `distribution()` always equals the per-class counts of the labels
/// currently held.
#[derive(Clone, Debug)]
pub struct ImbalanceWindow {
    capacity: usize,
    labels: VecDeque<usize>,
    distribution: Vec<u64>,
}

impl ImbalanceWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
            distribution: Vec::new(),
        }
    }

    /// Append a label, evicting the oldest one when full. Returns the evicted label.
    pub fn add_label(&mut self, label: usize) -> Option<usize> {
        if self.distribution.len() <= label {
            self.distribution.resize(label + 1, 0);
        }
        let evicted = if self.labels.len() == self.capacity {
            self.labels.pop_front()
        } else {
            None
        };
        if let Some(old) = evicted {
            self.distribution[old] -= 1;
        }
        self.labels.push_back(label);
        self.distribution[label] += 1;
        evicted
    }

    /// Make sure `distribution()` covers at least `num_classes` entries.
    pub fn ensure_classes(&mut self, num_classes: usize) {
        if self.distribution.len() < num_classes {
            self.distribution.resize(num_classes, 0);
        }
    }

    pub fn distribution(&self) -> &[u64] {
        &self.distribution
    }

    pub fn count(&self, class: usize) -> u64 {
        self.distribution.get(class).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.labels.len() == self.capacity
    }

    /// Most frequent class; ties go to the lowest index.
    pub fn majority_class(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        votes::max_index(&self.distribution)
    }

    /// Least frequent class, counting classes with zero occurrences.
    pub fn minority_class(&self) -> Option<usize> {
        votes::min_index(&self.distribution)
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.distribution.iter_mut().for_each(|c| *c = 0);
    }
}
