//! Deterministic collaborators and instance sequences shared by the
//! scenario and property suites.

use costforest_types::{ChangeDetector, Instance, Model, ModelFactory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

/// Fires on the observations whose script entry is `true`. A fresh copy
/// replays the script from the start.
#[derive(Clone, Debug)]
pub struct ScriptedDetector {
    script: Arc<[bool]>,
    observed: usize,
}

impl ScriptedDetector {
    pub fn new(script: Vec<bool>) -> Self {
        Self {
            script: script.into(),
            observed: 0,
        }
    }

    /// Fires on the `n`th observation (1-based) only.
    pub fn firing_at(n: usize) -> Self {
        let mut script = vec![false; n];
        if let Some(last) = script.last_mut() {
            *last = true;
        }
        Self::new(script)
    }

    pub fn never() -> Self {
        Self::new(Vec::new())
    }

    pub fn observed(&self) -> usize {
        self.observed
    }
}

impl ChangeDetector for ScriptedDetector {
    fn observe(&mut self, _signal: f64) {
        self.observed += 1;
    }

    fn change_detected(&self) -> bool {
        self.observed > 0 && self.script.get(self.observed - 1).copied().unwrap_or(false)
    }

    fn fresh(&self) -> Box<dyn ChangeDetector> {
        Box::new(Self {
            script: self.script.clone(),
            observed: 0,
        })
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Always votes the same vector and counts the weight it was trained with.
#[derive(Clone, Debug)]
pub struct FixedVoteModel {
    votes: Vec<f64>,
    trained_weight: f64,
}

impl FixedVoteModel {
    pub fn new(votes: Vec<f64>) -> Self {
        Self {
            votes,
            trained_weight: 0.0,
        }
    }

    pub fn trained_weight(&self) -> f64 {
        self.trained_weight
    }
}

impl Model for FixedVoteModel {
    fn train(&mut self, _instance: &Instance, weight: f64) {
        self.trained_weight += weight;
    }

    fn predict(&self, _instance: &Instance) -> Vec<f64> {
        self.votes.clone()
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }

    fn reset_to_untrained(&mut self) {
        self.trained_weight = 0.0;
    }

    fn name(&self) -> &str {
        "fixed_vote"
    }
}

/// Panics on its `n`th training call.
#[derive(Clone, Debug)]
pub struct PanickingModel {
    panic_on: usize,
    calls: usize,
}

impl PanickingModel {
    pub fn new(panic_on: usize) -> Self {
        Self { panic_on, calls: 0 }
    }
}

impl Model for PanickingModel {
    fn train(&mut self, _instance: &Instance, _weight: f64) {
        self.calls += 1;
        if self.calls >= self.panic_on {
            panic!("member model failed on call {}", self.calls);
        }
    }

    fn predict(&self, instance: &Instance) -> Vec<f64> {
        vec![0.0; instance.num_classes]
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }

    fn reset_to_untrained(&mut self) {
        self.calls = 0;
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

/// Builds a [`FixedVoteModel`] for every member.
#[derive(Clone, Debug)]
pub struct FixedVoteFactory {
    pub votes: Vec<f64>,
}

impl ModelFactory for FixedVoteFactory {
    fn build(&self, _member_index: usize, _subspace_size: usize) -> Box<dyn Model> {
        Box::new(FixedVoteModel::new(self.votes.clone()))
    }
}

/// Gives member `i` a [`FixedVoteModel`] voting `votes[i % votes.len()]`.
#[derive(Clone, Debug)]
pub struct PerMemberVoteFactory {
    pub votes: Vec<Vec<f64>>,
}

impl ModelFactory for PerMemberVoteFactory {
    fn build(&self, member_index: usize, _subspace_size: usize) -> Box<dyn Model> {
        let votes = self.votes[member_index % self.votes.len()].clone();
        Box::new(FixedVoteModel::new(votes))
    }
}

/// Builds a [`PanickingModel`] for one member and [`FixedVoteModel`]s elsewhere.
#[derive(Clone, Debug)]
pub struct PanickingFactory {
    pub member: usize,
    pub panic_on: usize,
}

impl ModelFactory for PanickingFactory {
    fn build(&self, member_index: usize, _subspace_size: usize) -> Box<dyn Model> {
        if member_index == self.member {
            Box::new(PanickingModel::new(self.panic_on))
        } else {
            Box::new(FixedVoteModel::new(vec![0.5, 0.5]))
        }
    }
}

/// Builds models that log every training weight, per member, into a log the
/// test keeps a handle on.
#[derive(Clone, Debug, Default)]
pub struct RecordingFactory {
    log: Arc<Mutex<Vec<Vec<f64>>>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Training weights member `index` has seen so far.
    pub fn weights(&self, index: usize) -> Vec<f64> {
        let log = self.log.lock().unwrap();
        log.get(index).cloned().unwrap_or_default()
    }
}

impl ModelFactory for RecordingFactory {
    fn build(&self, member_index: usize, _subspace_size: usize) -> Box<dyn Model> {
        let mut log = self.log.lock().unwrap();
        if log.len() <= member_index {
            log.resize(member_index + 1, Vec::new());
        }
        Box::new(RecordingModel {
            member: member_index,
            log: self.log.clone(),
        })
    }
}

#[derive(Clone, Debug)]
struct RecordingModel {
    member: usize,
    log: Arc<Mutex<Vec<Vec<f64>>>>,
}

impl Model for RecordingModel {
    fn train(&mut self, _instance: &Instance, weight: f64) {
        self.log.lock().unwrap()[self.member].push(weight);
    }

    fn predict(&self, instance: &Instance) -> Vec<f64> {
        vec![0.0; instance.num_classes]
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }

    fn reset_to_untrained(&mut self) {}

    fn name(&self) -> &str {
        "recording"
    }
}

// ---------------------------------------------------------------------------
// Instance sequences
// ---------------------------------------------------------------------------

/// Two well-separated Gaussian-ish blobs; every `minority_every`th instance
/// is class 1.
pub fn imbalanced_binary(count: usize, minority_every: usize, seed: u64) -> Vec<Instance> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let label = usize::from(minority_every > 0 && i % minority_every == minority_every - 1);
            blob(&mut rng, label, label)
        })
        .collect()
}

/// Same blobs, but from `flip_at` on the labels are swapped.
pub fn flipping_binary(count: usize, flip_at: usize, seed: u64) -> Vec<Instance> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let centre = i % 2;
            let label = if i >= flip_at { 1 - centre } else { centre };
            blob(&mut rng, centre, label)
        })
        .collect()
}

fn blob(rng: &mut StdRng, centre: usize, label: usize) -> Instance {
    let base = if centre == 0 { 2.0 } else { 8.0 };
    let features = (0..4).map(|_| base + rng.gen_range(-1.0..1.0)).collect();
    Instance {
        features,
        class_label: label,
        num_classes: 2,
        weight: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_detector_replays() {
        let mut d = ScriptedDetector::firing_at(2);
        d.observe(0.0);
        assert!(!d.change_detected());
        d.observe(0.0);
        assert!(d.change_detected());
        d.observe(0.0);
        assert!(!d.change_detected());
        let mut f = d.fresh();
        f.observe(1.0);
        f.observe(1.0);
        assert!(f.change_detected());
    }

    #[test]
    fn imbalance_ratio() {
        let xs = imbalanced_binary(100, 10, 1);
        assert_eq!(xs.iter().filter(|i| i.class_label == 1).count(), 10);
    }
}
