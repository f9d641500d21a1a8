use crate::error::{StreamError, StreamResult};
use crate::stream::{InstanceStream, StreamHeader};
use costforest_types::Instance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Draws from the inner stream this many times before giving up on a class.
const MAX_ATTEMPTS: usize = 100_000;

/// Resamples an inner stream so emitted labels follow `class_ratios`.
///
/// Each instance first picks its class from the ratios, then pulls from the
/// inner stream until an instance of that class turns up.
pub struct ImbalancedStream<S> {
    inner: S,
    ratios: Vec<f64>,
    seed: u64,
    rng: StdRng,
}

impl<S: InstanceStream> ImbalancedStream<S> {
    pub fn new(inner: S, class_ratios: Vec<f64>, seed: u64) -> StreamResult<Self> {
        let num_classes = inner.header().num_classes;
        if class_ratios.len() != num_classes {
            return Err(StreamError::InvalidRatios(format!(
                "{} ratios for {} classes",
                class_ratios.len(),
                num_classes
            )));
        }
        if class_ratios.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(StreamError::InvalidRatios(format!(
                "ratios must be non-negative: {:?}",
                class_ratios
            )));
        }
        let total: f64 = class_ratios.iter().sum();
        if !(total > 0.0) {
            return Err(StreamError::InvalidRatios("ratios sum to zero".into()));
        }
        Ok(Self {
            inner,
            ratios: class_ratios.iter().map(|r| r / total).collect(),
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Normalized ratios.
    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn pick_class(&mut self) -> usize {
        let u: f64 = self.rng.gen();
        let mut acc = 0.0;
        for (class, ratio) in self.ratios.iter().enumerate() {
            acc += ratio;
            if u < acc {
                return class;
            }
        }
        self.ratios.iter().rposition(|r| *r > 0.0).unwrap_or(0)
    }
}

/// Parse ratios written as `0.9;0.1` or `0.9,0.1`.
pub fn parse_ratios(text: &str) -> StreamResult<Vec<f64>> {
    text.split(|c: char| c == ';' || c == ',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .map_err(|e| StreamError::InvalidRatios(format!("{part}: {e}")))
        })
        .collect()
}

impl<S: InstanceStream> InstanceStream for ImbalancedStream<S> {
    fn header(&self) -> StreamHeader {
        self.inner.header()
    }

    fn next_instance(&mut self) -> Option<Instance> {
        let class = self.pick_class();
        for _ in 0..MAX_ATTEMPTS {
            let inst = self.inner.next_instance()?;
            if inst.class_label == class {
                return Some(inst);
            }
        }
        warn!(class, attempts = MAX_ATTEMPTS, "inner stream never produced class");
        None
    }

    fn restart(&mut self) {
        self.inner.restart();
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}
