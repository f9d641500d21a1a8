use crate::error::{StreamError, StreamResult};
use crate::stream::InstanceStream;
use costforest_engine::{CostSensitiveForest, ForestMeasurements};
use costforest_learners::{EvaluationSummary, ImbalancedEvaluator};
use costforest_types::PerformanceEvaluator;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Test-then-train evaluation over a stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrequentialEvaluation {
    pub max_instances: u64,
    /// Emit a learning-curve point every this many instances.
    pub sample_frequency: u64,
    /// Sliding window of the evaluator, in instances.
    pub window: usize,
}

impl Default for PrequentialEvaluation {
    fn default() -> Self {
        Self {
            max_instances: 100_000,
            sample_frequency: 10_000,
            window: 10_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningCurvePoint {
    pub instances: u64,
    pub accuracy: Option<f64>,
    pub f1: Option<f64>,
    pub g_mean: Option<f64>,
    pub drifts: u64,
    pub warnings: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrequentialReport {
    pub curve: Vec<LearningCurvePoint>,
    pub summary: EvaluationSummary,
    pub measurements: ForestMeasurements,
}

impl PrequentialEvaluation {
    pub fn run(
        &self,
        forest: &mut CostSensitiveForest,
        stream: &mut dyn InstanceStream,
    ) -> StreamResult<PrequentialReport> {
        if self.sample_frequency == 0 {
            return Err(StreamError::InvalidSampleFrequency);
        }
        let mut evaluator = ImbalancedEvaluator::windowed(self.window);
        let mut curve = Vec::new();
        let mut processed = 0u64;

        while processed < self.max_instances {
            let Some(instance) = stream.next_instance() else {
                debug!(processed, "stream exhausted");
                break;
            };
            let votes = forest.predict(&instance)?;
            evaluator.record_result(instance.class_label, &votes);
            forest.train(&instance)?;
            processed += 1;

            if processed % self.sample_frequency == 0 {
                curve.push(self.sample(processed, &evaluator, forest));
            }
        }
        if processed % self.sample_frequency != 0 {
            curve.push(self.sample(processed, &evaluator, forest));
        }

        let summary = evaluator.summary();
        info!(
            instances = processed,
            accuracy = ?summary.accuracy,
            f1 = ?summary.f1,
            g_mean = ?summary.g_mean,
            "prequential run finished"
        );
        Ok(PrequentialReport {
            curve,
            summary,
            measurements: forest.measurements(),
        })
    }

    fn sample(
        &self,
        processed: u64,
        evaluator: &ImbalancedEvaluator,
        forest: &CostSensitiveForest,
    ) -> LearningCurvePoint {
        let m = forest.measurements();
        let point = LearningCurvePoint {
            instances: processed,
            accuracy: evaluator.accuracy(),
            f1: evaluator.f1_score(),
            g_mean: evaluator.g_mean(),
            drifts: m.drifts_detected,
            warnings: m.warnings_detected,
        };
        debug!(instances = processed, f1 = ?point.f1, "learning curve sample");
        point
    }
}
