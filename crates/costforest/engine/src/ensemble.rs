use crate::config::{ForestConfig, ThresholdMode};
use crate::cost::{CostHeuristic, CostMatrix};
use crate::error::{ForestError, ForestResult};
use crate::forest::{Collaborators, ForestEngine};
use crate::measurements::{ForestMeasurements, MemberMeasurement};
use crate::member::{LearnerState, MemberSettings};
use crate::sampling::ReplicationSampler;
use crate::scheduler::{TrainingScheduler, TrainingTask};
use crate::window::ImbalanceWindow;
use costforest_learners::ImbalancedEvaluator;
use costforest_types::{votes, ChangeDetector, Instance, Model, ModelFactory, PerformanceEvaluator};
use std::sync::Arc;
use tracing::debug;

/// Everything built lazily from the first instance of a session.
#[derive(Debug)]
struct EnsembleState {
    forest: ForestEngine,
    costs: CostMatrix,
    window: ImbalanceWindow,
    heuristic: CostHeuristic,
}

impl EnsembleState {
    fn start(
        first: &Instance,
        config: &ForestConfig,
        collaborators: &Collaborators,
        instances_seen: u64,
    ) -> Self {
        let num_classes = first.num_classes;
        let settings = MemberSettings {
            drift_detection: config.drift_detection,
            background_learners: config.background_learners,
        };
        let forest = ForestEngine::build(
            first,
            config.ensemble_size,
            config.subspace,
            settings,
            collaborators,
            instances_seen,
        );
        let mut window = ImbalanceWindow::new(config.window_size);
        window.ensure_classes(num_classes);
        debug!(
            ensemble_size = forest.len(),
            subspace_size = forest.subspace_size(),
            num_classes,
            threshold_mode = ?config.threshold_mode,
            cost_strategy = ?config.cost_strategy,
            "ensemble initialised"
        );
        Self {
            forest,
            costs: CostMatrix::new(num_classes),
            window,
            heuristic: CostHeuristic::for_strategy(config.cost_strategy, num_classes),
        }
    }

    fn refresh_costs(&mut self) {
        let num_classes = self.forest.num_classes();
        let Self {
            costs,
            window,
            heuristic,
            ..
        } = self;
        costs.recompute(|class| heuristic.class_cost(class, window, num_classes));
    }

    /// Weighted, cost-thresholded ensemble vote.
    fn combined_vote(&self, instance: &Instance, config: &ForestConfig) -> Vec<f64> {
        let mut combined = vec![0.0; self.forest.num_classes()];
        for member in self.forest.members() {
            let mut vote = member.predict(instance);
            if votes::is_empty_vote(&vote) {
                continue;
            }
            if config.threshold_mode == ThresholdMode::Local {
                self.costs.apply_to(&mut vote);
            }
            votes::normalize(&mut vote);
            if config.weighted_vote {
                if let Some(weight) = member.metric().filter(|m| m.is_finite() && *m > 0.0) {
                    vote.iter_mut().for_each(|v| *v *= weight);
                }
            }
            votes::add_into(&mut combined, &vote);
        }
        if config.threshold_mode == ThresholdMode::Global && !votes::is_empty_vote(&combined) {
            self.costs.apply_to(&mut combined);
        }
        votes::normalize(&mut combined);
        combined
    }
}

/// Cost-sensitive adaptive random forest for imbalanced, drifting streams.
///
/// Every member trains on each instance with a Poisson(λ) replication
/// weight. Instances whose class is not the window's majority are always
/// trained on, with weight at least one. Votes are rebalanced by a cost
/// matrix derived from the recent class distribution.
///
/// ```no_run
/// use costforest_engine::{CostSensitiveForest, ForestConfig};
/// use costforest_types::Instance;
///
/// let mut forest = CostSensitiveForest::new(ForestConfig::small())?;
/// let inst = Instance::new(vec![1.0, 4.0, 2.5], 1, 2)?;
/// let votes = forest.predict(&inst)?;
/// forest.train(&inst)?;
/// # let _ = votes;
/// # Ok::<(), costforest_engine::ForestError>(())
/// ```
pub struct CostSensitiveForest {
    config: ForestConfig,
    collaborators: Collaborators,
    scheduler: Option<TrainingScheduler>,
    state: Option<EnsembleState>,
    sampler: ReplicationSampler,
    instances_seen: u64,
}

impl CostSensitiveForest {
    pub fn new(config: ForestConfig) -> ForestResult<Self> {
        ForestBuilder::new(config).build()
    }

    pub fn builder(config: ForestConfig) -> ForestBuilder {
        ForestBuilder::new(config)
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn instances_seen(&self) -> u64 {
        self.instances_seen
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Train on one labelled instance.
    pub fn train(&mut self, instance: &Instance) -> ForestResult<()> {
        self.check_instance(instance)?;
        let Self {
            config,
            collaborators,
            scheduler,
            state,
            sampler,
            instances_seen,
        } = self;
        *instances_seen += 1;
        let instances_seen = *instances_seen;
        let (scheduler, state) =
            open_session(scheduler, state, config, collaborators, instance, instances_seen)?;

        let label = instance.class_label;
        let ensemble_vote = state.combined_vote(instance, config);
        state.window.add_label(label);
        state.heuristic.observe(label, &ensemble_vote, instances_seen);
        state.refresh_costs();

        let positive = state.window.majority_class() != Some(label);
        let mut tasks = Vec::with_capacity(state.forest.len());
        for member in state.forest.members_mut() {
            let mut vote = member.predict(instance);
            if config.threshold_mode == ThresholdMode::Training {
                state.costs.apply_to(&mut vote);
            }
            votes::normalize(&mut vote);
            member.record_result(label, &vote);

            let k = sampler.draw();
            if k > 0 || positive {
                tasks.push(TrainingTask {
                    member: member.index(),
                    weight: k.max(1) as f64,
                });
            }
        }
        let outcomes = state
            .forest
            .train(scheduler, &tasks, instance, instances_seen)?;
        let drifts = outcomes.iter().filter(|(_, o)| o.drift).count();
        let warnings = outcomes.iter().filter(|(_, o)| o.warning).count();
        if drifts + warnings > 0 {
            debug!(
                instances_seen,
                trained = outcomes.len(),
                drifts,
                warnings,
                "members changed this round"
            );
        }
        Ok(())
    }

    /// Normalized class-probability vote; all zeros before anything is learned.
    pub fn predict(&mut self, instance: &Instance) -> ForestResult<Vec<f64>> {
        self.check_instance(instance)?;
        let Self {
            config,
            collaborators,
            scheduler,
            state,
            instances_seen,
            ..
        } = self;
        let (_, state) =
            open_session(scheduler, state, config, collaborators, instance, *instances_seen)?;
        Ok(state.combined_vote(instance, config))
    }

    /// Drop all learned state and start a new session with a fresh pool.
    pub fn reset_learning_session(&mut self) -> ForestResult<()> {
        self.end_session();
        self.scheduler = Some(TrainingScheduler::new(self.config.concurrency)?);
        Ok(())
    }

    /// Release the worker pool and clear ensemble state. The next
    /// `train`/`predict` starts a fresh session.
    pub fn end_session(&mut self) {
        self.scheduler = None;
        self.state = None;
        self.instances_seen = 0;
        self.sampler.reseed();
    }

    /// Class counts over the imbalance window.
    pub fn class_distribution(&self) -> Option<&[u64]> {
        self.state.as_ref().map(|s| s.window.distribution())
    }

    pub fn class_cost(&self, class: usize) -> Option<f64> {
        self.state.as_ref()?.costs.cost_for_class(class)
    }

    pub fn cost_matrix(&self) -> Option<&CostMatrix> {
        self.state.as_ref().map(|s| &s.costs)
    }

    pub fn forest(&self) -> Option<&ForestEngine> {
        self.state.as_ref().map(|s| &s.forest)
    }

    pub fn sub_models(&self) -> Vec<&dyn Model> {
        self.forest().map(ForestEngine::sub_models).unwrap_or_default()
    }

    pub fn measurements(&self) -> ForestMeasurements {
        let scheduler_jobs = self.scheduler.as_ref().map_or(0, TrainingScheduler::jobs);
        let Some(state) = &self.state else {
            return ForestMeasurements {
                instances_seen: self.instances_seen,
                scheduler_jobs,
                ..Default::default()
            };
        };
        let members: Vec<MemberMeasurement> = state
            .forest
            .members()
            .iter()
            .map(|m| MemberMeasurement {
                index: m.index(),
                state: m.state(),
                created_on: m.created_on(),
                last_drift_on: m.last_drift_on(),
                last_warning_on: m.last_warning_on(),
                drift_count: m.drift_count(),
                warning_count: m.warning_count(),
                metric: m.metric(),
            })
            .collect();
        ForestMeasurements {
            instances_seen: self.instances_seen,
            ensemble_size: state.forest.len(),
            subspace_size: state.forest.subspace_size(),
            scheduler_jobs,
            drifts_detected: state.forest.drifts_detected(),
            warnings_detected: state.forest.warnings_detected(),
            members_in_warning: members
                .iter()
                .filter(|m| m.state == LearnerState::Warning)
                .count(),
            class_distribution: state.window.distribution().to_vec(),
            class_costs: state.costs.class_costs(),
            members,
        }
    }

    fn check_instance(&self, instance: &Instance) -> ForestResult<()> {
        let num_classes = match &self.state {
            Some(state) => {
                let expected = state.forest.num_classes();
                if instance.num_classes != expected {
                    return Err(ForestError::ClassCountMismatch {
                        expected,
                        found: instance.num_classes,
                    });
                }
                expected
            }
            None => instance.num_classes,
        };
        if instance.class_label >= num_classes {
            return Err(ForestError::LabelOutOfRange {
                label: instance.class_label,
                num_classes,
            });
        }
        Ok(())
    }
}

/// Start the pool and build the ensemble from `first` unless the session is
/// already running, then hand both back.
fn open_session<'a>(
    scheduler: &'a mut Option<TrainingScheduler>,
    state: &'a mut Option<EnsembleState>,
    config: &ForestConfig,
    collaborators: &Collaborators,
    first: &Instance,
    instances_seen: u64,
) -> ForestResult<(&'a TrainingScheduler, &'a mut EnsembleState)> {
    let pool = match scheduler.take() {
        Some(pool) => pool,
        None => TrainingScheduler::new(config.concurrency)?,
    };
    let ensemble = match state.take() {
        Some(ensemble) => ensemble,
        None => EnsembleState::start(first, config, collaborators, instances_seen),
    };
    Ok((&*scheduler.insert(pool), state.insert(ensemble)))
}

impl std::fmt::Debug for CostSensitiveForest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostSensitiveForest")
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .field("instances_seen", &self.instances_seen)
            .field("initialized", &self.state.is_some())
            .finish()
    }
}

/// Builds a [`CostSensitiveForest`], optionally swapping the collaborators
/// the configuration would otherwise pick.
pub struct ForestBuilder {
    config: ForestConfig,
    model_factory: Option<Arc<dyn ModelFactory>>,
    drift_detector: Option<Box<dyn ChangeDetector>>,
    warning_detector: Option<Box<dyn ChangeDetector>>,
    evaluator: Option<Box<dyn PerformanceEvaluator>>,
}

impl ForestBuilder {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            model_factory: None,
            drift_detector: None,
            warning_detector: None,
            evaluator: None,
        }
    }

    pub fn model_factory(mut self, factory: impl ModelFactory + 'static) -> Self {
        self.model_factory = Some(Arc::new(factory));
        self
    }

    pub fn drift_detector(mut self, detector: impl ChangeDetector + 'static) -> Self {
        self.drift_detector = Some(Box::new(detector));
        self
    }

    pub fn warning_detector(mut self, detector: impl ChangeDetector + 'static) -> Self {
        self.warning_detector = Some(Box::new(detector));
        self
    }

    pub fn evaluator(mut self, evaluator: impl PerformanceEvaluator + 'static) -> Self {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    pub fn build(self) -> ForestResult<CostSensitiveForest> {
        let config = self.config;
        config.validate()?;
        let collaborators = Collaborators {
            model_factory: self
                .model_factory
                .unwrap_or_else(|| Arc::new(config.base_model.clone()) as Arc<dyn ModelFactory>),
            drift_detector: self
                .drift_detector
                .unwrap_or_else(|| config.drift_detector.build()),
            warning_detector: self
                .warning_detector
                .unwrap_or_else(|| config.warning_detector.build()),
            evaluator: self
                .evaluator
                .unwrap_or_else(|| {
                    Box::new(ImbalancedEvaluator::new()) as Box<dyn PerformanceEvaluator>
                }),
        };
        let sampler = ReplicationSampler::new(config.lambda, config.seed)?;
        let scheduler = TrainingScheduler::new(config.concurrency)?;
        Ok(CostSensitiveForest {
            config,
            collaborators,
            scheduler: Some(scheduler),
            state: None,
            sampler,
            instances_seen: 0,
        })
    }
}
