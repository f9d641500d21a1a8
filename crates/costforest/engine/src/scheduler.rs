use crate::config::Concurrency;
use crate::error::{ForestError, ForestResult};
use crate::member::{Member, TrainOutcome};
use costforest_types::Instance;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// One member's share of an instance: train it with replication weight `weight`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingTask {
    pub member: usize,
    pub weight: f64,
}

/// Runs per-member training for one instance and waits for all of it.
///
/// Each member is touched by at most one task per instance. A panicking
/// task surfaces as [`ForestError::TrainingTaskFailed`] once the batch has
/// drained.
pub enum TrainingScheduler {
    Sequential,
    Pool { pool: rayon::ThreadPool, jobs: usize },
}

impl TrainingScheduler {
    pub fn new(concurrency: Concurrency) -> ForestResult<Self> {
        let jobs = concurrency.worker_count();
        if jobs <= 1 {
            debug!("training on the calling thread");
            return Ok(Self::Sequential);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("costforest-train-{i}"))
            .build()
            .map_err(|e| ForestError::PoolUnavailable(e.to_string()))?;
        debug!(jobs, "training pool started");
        Ok(Self::Pool { pool, jobs })
    }

    pub fn jobs(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Pool { jobs, .. } => *jobs,
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, Self::Pool { .. })
    }

    /// Train every member named in `tasks`. Results come back in member order.
    pub fn run(
        &self,
        members: &mut [Member],
        tasks: &[TrainingTask],
        instance: &Instance,
        instances_seen: u64,
    ) -> ForestResult<Vec<(usize, TrainOutcome)>> {
        let mut weights: Vec<Option<f64>> = vec![None; members.len()];
        for task in tasks {
            if let Some(slot) = weights.get_mut(task.member) {
                *slot = Some(task.weight);
            }
        }
        let batch: Vec<(&mut Member, f64)> = members
            .iter_mut()
            .zip(weights)
            .filter_map(|(member, weight)| weight.map(|w| (member, w)))
            .collect();

        let results: Vec<ForestResult<(usize, TrainOutcome)>> = match self {
            Self::Sequential => batch
                .into_iter()
                .map(|(member, weight)| train_guarded(member, instance, weight, instances_seen))
                .collect(),
            Self::Pool { pool, .. } => pool.install(|| {
                batch
                    .into_par_iter()
                    .map(|(member, weight)| {
                        train_guarded(member, instance, weight, instances_seen)
                    })
                    .collect()
            }),
        };
        results.into_iter().collect()
    }
}

impl std::fmt::Debug for TrainingScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => f.write_str("Sequential"),
            Self::Pool { jobs, .. } => f.debug_struct("Pool").field("jobs", jobs).finish(),
        }
    }
}

fn train_guarded(
    member: &mut Member,
    instance: &Instance,
    weight: f64,
    instances_seen: u64,
) -> ForestResult<(usize, TrainOutcome)> {
    let index = member.index();
    panic::catch_unwind(AssertUnwindSafe(|| {
        member.train(instance, weight, instances_seen)
    }))
    .map(|outcome| (index, outcome))
    .map_err(|payload| ForestError::TrainingTaskFailed {
        member: index,
        reason: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "training task panicked".to_string()
    }
}
