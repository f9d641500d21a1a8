use costforest_types::{ChangeDetector, Instance, Model, PerformanceEvaluator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which position a learner occupies inside its member slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerRole {
    Primary,
    Background,
}

/// Observable state of a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerState {
    Active,
    /// A warning fired and a background learner is being trained.
    Warning,
}

/// Switches shared by every member of an ensemble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberSettings {
    pub drift_detection: bool,
    pub background_learners: bool,
}

impl Default for MemberSettings {
    fn default() -> Self {
        Self {
            drift_detection: true,
            background_learners: true,
        }
    }
}

/// What happened while training a member on one instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrainOutcome {
    pub warning: bool,
    pub drift: bool,
    /// The background learner replaced the primary.
    pub promoted: bool,
}

/// A model with the detectors and evaluator that travel with it.
pub struct Learner {
    role: LearnerRole,
    created_on: u64,
    model: Box<dyn Model>,
    drift_detector: Option<Box<dyn ChangeDetector>>,
    warning_detector: Option<Box<dyn ChangeDetector>>,
    evaluator: Box<dyn PerformanceEvaluator>,
}

impl Learner {
    pub fn role(&self) -> LearnerRole {
        self.role
    }

    pub fn created_on(&self) -> u64 {
        self.created_on
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn evaluator(&self) -> &dyn PerformanceEvaluator {
        self.evaluator.as_ref()
    }

    fn fresh_detectors(
        &self,
    ) -> (
        Option<Box<dyn ChangeDetector>>,
        Option<Box<dyn ChangeDetector>>,
    ) {
        (
            self.drift_detector.as_ref().map(|d| d.fresh()),
            self.warning_detector.as_ref().map(|d| d.fresh()),
        )
    }
}

impl std::fmt::Debug for Learner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Learner")
            .field("role", &self.role)
            .field("created_on", &self.created_on)
            .field("model", &self.model.name())
            .field("metric", &self.evaluator.current_metric())
            .finish()
    }
}

/// One ensemble slot: a primary learner and, while in warning, a background
/// learner that takes its place on drift.
#[derive(Debug)]
pub struct Member {
    index: usize,
    settings: MemberSettings,
    primary: Learner,
    background: Option<Learner>,
    last_drift_on: u64,
    last_warning_on: u64,
    drift_count: u64,
    warning_count: u64,
}

impl Member {
    pub fn new(
        index: usize,
        model: Box<dyn Model>,
        evaluator: Box<dyn PerformanceEvaluator>,
        drift_prototype: &dyn ChangeDetector,
        warning_prototype: &dyn ChangeDetector,
        settings: MemberSettings,
        instances_seen: u64,
    ) -> Self {
        let drift_detector = settings.drift_detection.then(|| drift_prototype.fresh());
        let warning_detector = (settings.drift_detection && settings.background_learners)
            .then(|| warning_prototype.fresh());
        Self {
            index,
            settings,
            primary: Learner {
                role: LearnerRole::Primary,
                created_on: instances_seen,
                model,
                drift_detector,
                warning_detector,
                evaluator,
            },
            background: None,
            last_drift_on: 0,
            last_warning_on: 0,
            drift_count: 0,
            warning_count: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> LearnerState {
        if self.background.is_some() {
            LearnerState::Warning
        } else {
            LearnerState::Active
        }
    }

    pub fn primary(&self) -> &Learner {
        &self.primary
    }

    pub fn background(&self) -> Option<&Learner> {
        self.background.as_ref()
    }

    pub fn model(&self) -> &dyn Model {
        self.primary.model()
    }

    pub fn created_on(&self) -> u64 {
        self.primary.created_on
    }

    pub fn last_drift_on(&self) -> u64 {
        self.last_drift_on
    }

    pub fn last_warning_on(&self) -> u64 {
        self.last_warning_on
    }

    pub fn drift_count(&self) -> u64 {
        self.drift_count
    }

    pub fn warning_count(&self) -> u64 {
        self.warning_count
    }

    /// Primary evaluator's metric, used to weight this member's vote.
    pub fn metric(&self) -> Option<f64> {
        self.primary.evaluator.current_metric()
    }

    pub fn predict(&self, instance: &Instance) -> Vec<f64> {
        self.primary.model.predict(instance)
    }

    pub fn record_result(&mut self, true_label: usize, votes: &[f64]) {
        self.primary.evaluator.record_result(true_label, votes);
    }

    /// Train on `instance` replicated `k` times, then run the warning and
    /// drift checks against the updated primary.
    pub fn train(&mut self, instance: &Instance, k: f64, instances_seen: u64) -> TrainOutcome {
        let mut outcome = TrainOutcome::default();
        self.primary.model.train(instance, instance.weight * k);
        if let Some(bg) = self.background.as_mut() {
            bg.model.train(instance, instance.weight);
        }
        if !self.settings.drift_detection {
            return outcome;
        }

        let signal = if self.primary.model.correctly_classifies(instance) {
            0.0
        } else {
            1.0
        };

        let warned = match self.primary.warning_detector.as_mut() {
            Some(detector) if self.settings.background_learners => {
                detector.observe(signal);
                detector.change_detected()
            }
            _ => false,
        };
        if warned {
            self.start_background(instances_seen);
            outcome.warning = true;
        }

        let drifted = match self.primary.drift_detector.as_mut() {
            Some(detector) => {
                detector.observe(signal);
                detector.change_detected()
            }
            None => false,
        };
        if drifted {
            self.last_drift_on = instances_seen;
            self.drift_count += 1;
            outcome.drift = true;
            outcome.promoted = self.reset(instances_seen);
            info!(
                member = self.index,
                instances_seen,
                promoted = outcome.promoted,
                "drift detected"
            );
        }
        outcome
    }

    /// Promote the background learner if there is one, otherwise restart the
    /// primary from scratch. Returns whether a promotion happened.
    pub fn reset(&mut self, instances_seen: u64) -> bool {
        let promoted = match self.background.take() {
            Some(mut bg) if self.settings.background_learners => {
                bg.role = LearnerRole::Primary;
                self.primary = bg;
                true
            }
            _ => false,
        };
        if !promoted {
            self.primary.model.reset_to_untrained();
            self.primary.created_on = instances_seen;
            if let Some(detector) = self.primary.drift_detector.as_mut() {
                let fresh = detector.fresh();
                *detector = fresh;
            }
        }
        self.primary.evaluator.reset();
        promoted
    }

    fn start_background(&mut self, instances_seen: u64) {
        self.last_warning_on = instances_seen;
        self.warning_count += 1;

        let mut model = self.primary.model.boxed_clone();
        model.reset_to_untrained();
        let mut evaluator = self.primary.evaluator.boxed_clone();
        evaluator.reset();
        let (drift_detector, warning_detector) = self.primary.fresh_detectors();
        let replaced = self
            .background
            .replace(Learner {
                role: LearnerRole::Background,
                created_on: instances_seen,
                model,
                drift_detector,
                warning_detector,
                evaluator,
            })
            .is_some();

        if let Some(detector) = self.primary.warning_detector.as_mut() {
            let fresh = detector.fresh();
            *detector = fresh;
        }
        info!(member = self.index, instances_seen, "warning detected");
        if replaced {
            debug!(member = self.index, "stale background learner replaced");
        }
    }
}
