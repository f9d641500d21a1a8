use crate::config::{ResolvedSubspace, SubspaceMode};
use crate::error::ForestResult;
use crate::member::{Member, MemberSettings, TrainOutcome};
use crate::scheduler::{TrainingScheduler, TrainingTask};
use costforest_types::{ChangeDetector, Instance, Model, ModelFactory, PerformanceEvaluator};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prototypes every member is built from.
pub struct Collaborators {
    pub model_factory: Arc<dyn ModelFactory>,
    pub drift_detector: Box<dyn ChangeDetector>,
    pub warning_detector: Box<dyn ChangeDetector>,
    pub evaluator: Box<dyn PerformanceEvaluator>,
}

/// Adaptive random forest: an arena of members over random feature subspaces.
#[derive(Debug)]
pub struct ForestEngine {
    members: Vec<Member>,
    subspace: ResolvedSubspace,
    num_features: usize,
    num_classes: usize,
}

impl ForestEngine {
    /// Size the subspace from `first`'s header and build `ensemble_size` members.
    pub fn build(
        first: &Instance,
        ensemble_size: usize,
        subspace_mode: SubspaceMode,
        settings: MemberSettings,
        collaborators: &Collaborators,
        instances_seen: u64,
    ) -> Self {
        let num_features = first.num_features();
        let subspace = subspace_mode.resolve(num_features);
        if subspace.clamped() {
            warn!(
                requested = subspace.requested,
                size = subspace.size,
                num_features,
                "feature subspace size clamped"
            );
        }
        let members = (0..ensemble_size)
            .map(|index| {
                Member::new(
                    index,
                    collaborators.model_factory.build(index, subspace.size),
                    collaborators.evaluator.boxed_clone(),
                    collaborators.drift_detector.as_ref(),
                    collaborators.warning_detector.as_ref(),
                    settings,
                    instances_seen,
                )
            })
            .collect();
        debug!(
            ensemble_size,
            subspace_size = subspace.size,
            num_features,
            "forest built"
        );
        Self {
            members,
            subspace,
            num_features,
            num_classes: first.num_classes,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn subspace_size(&self) -> usize {
        self.subspace.size
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Member] {
        &mut self.members
    }

    pub fn sub_models(&self) -> Vec<&dyn Model> {
        self.members.iter().map(|m| m.model()).collect()
    }

    pub fn train(
        &mut self,
        scheduler: &TrainingScheduler,
        tasks: &[TrainingTask],
        instance: &Instance,
        instances_seen: u64,
    ) -> ForestResult<Vec<(usize, TrainOutcome)>> {
        scheduler.run(&mut self.members, tasks, instance, instances_seen)
    }

    pub fn drifts_detected(&self) -> u64 {
        self.members.iter().map(Member::drift_count).sum()
    }

    pub fn warnings_detected(&self) -> u64 {
        self.members.iter().map(Member::warning_count).sum()
    }
}
