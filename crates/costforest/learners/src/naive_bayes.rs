use crate::gaussian::GaussianEstimator;
use costforest_types::{Instance, Model};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Log-density floor so a single impossible attribute cannot zero a class out.
const LOG_DENSITY_FLOOR: f64 = -700.0;

/// Gaussian naive Bayes restricted to a random subset of the features.
///
/// The subset is drawn from the model's own RNG on the first training call
/// after construction or reset, so two members built with different seeds
/// look at different features.
#[derive(Clone, Debug)]
pub struct SubspaceNaiveBayes {
    subspace_size: usize,
    rng: StdRng,
    subspace: Option<Vec<usize>>,
    class_weights: Vec<f64>,
    /// `[class][position in subspace]`
    estimators: Vec<Vec<GaussianEstimator>>,
}

impl SubspaceNaiveBayes {
    pub fn new(subspace_size: usize, seed: u64) -> Self {
        Self {
            subspace_size,
            rng: StdRng::seed_from_u64(seed),
            subspace: None,
            class_weights: Vec::new(),
            estimators: Vec::new(),
        }
    }

    pub fn subspace_size(&self) -> usize {
        self.subspace_size
    }

    /// Feature indices this model currently looks at, once trained.
    pub fn subspace(&self) -> Option<&[usize]> {
        self.subspace.as_deref()
    }

    pub fn total_weight(&self) -> f64 {
        self.class_weights.iter().sum()
    }

    fn ensure_subspace(&mut self, num_features: usize) -> Vec<usize> {
        if let Some(subspace) = &self.subspace {
            return subspace.clone();
        }
        let mut chosen = if num_features == 0 {
            Vec::new()
        } else {
            let k = self.subspace_size.clamp(1, num_features);
            rand::seq::index::sample(&mut self.rng, num_features, k).into_vec()
        };
        chosen.sort_unstable();
        self.subspace = Some(chosen.clone());
        chosen
    }

    fn ensure_classes(&mut self, num_classes: usize, subspace_len: usize) {
        if self.class_weights.len() < num_classes {
            self.class_weights.resize(num_classes, 0.0);
            self.estimators
                .resize(num_classes, vec![GaussianEstimator::default(); subspace_len]);
        }
    }
}

impl Model for SubspaceNaiveBayes {
    fn train(&mut self, instance: &Instance, weight: f64) {
        if !(weight > 0.0) {
            return;
        }
        let subspace = self.ensure_subspace(instance.num_features());
        let num_classes = instance.num_classes.max(instance.class_label + 1);
        self.ensure_classes(num_classes, subspace.len());

        let label = instance.class_label;
        self.class_weights[label] += weight;
        for (pos, &feature) in subspace.iter().enumerate() {
            if let Some(value) = instance.feature(feature) {
                self.estimators[label][pos].add(value, weight);
            }
        }
    }

    fn predict(&self, instance: &Instance) -> Vec<f64> {
        let num_classes = instance.num_classes.max(self.class_weights.len());
        let mut votes = vec![0.0; num_classes];
        let total = self.total_weight();
        let Some(subspace) = &self.subspace else {
            return votes;
        };
        if !(total > 0.0) {
            return votes;
        }

        let mut log_posteriors: Vec<Option<f64>> = vec![None; num_classes];
        for (class, &class_weight) in self.class_weights.iter().enumerate() {
            if class_weight <= 0.0 {
                continue;
            }
            let mut log_p = (class_weight / total).ln();
            for (pos, &feature) in subspace.iter().enumerate() {
                if let Some(value) = instance.feature(feature) {
                    let density = self.estimators[class][pos].density(value);
                    log_p += if density > 0.0 {
                        density.ln().max(LOG_DENSITY_FLOOR)
                    } else {
                        LOG_DENSITY_FLOOR
                    };
                }
            }
            log_posteriors[class] = Some(log_p);
        }

        let max_log = log_posteriors
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !max_log.is_finite() {
            return votes;
        }
        for (vote, log_p) in votes.iter_mut().zip(&log_posteriors) {
            if let Some(log_p) = log_p {
                *vote = (log_p - max_log).exp();
            }
        }
        costforest_types::votes::normalize(&mut votes);
        votes
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }

    fn reset_to_untrained(&mut self) {
        self.subspace = None;
        self.class_weights.clear();
        self.estimators.clear();
    }

    fn name(&self) -> &str {
        "subspace_naive_bayes"
    }
}
