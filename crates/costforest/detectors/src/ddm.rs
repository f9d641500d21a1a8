//! DDM (Drift Detection Method).
//!
//! Tracks the running error rate `p` and its standard deviation `s`, and
//! signals a change once `p + s` climbs `drift_level` deviations above the
//! best `p_min + s_min` seen so far.
//!
//! Reference: Gama, J., Medas, P., Castillo, G. and Rodrigues, P., 2004.
//! Learning with drift detection. Brazilian Symposium on Artificial Intelligence.

use costforest_types::ChangeDetector;

/// DDM level after the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdmState {
    Stable,
    Warning,
    Drift,
}

/// DDM change detector.
#[derive(Debug, Clone)]
pub struct Ddm {
    min_instances: u64,
    warning_level: f64,
    drift_level: f64,
    n: u64,
    p: f64,
    p_min: f64,
    s_min: f64,
    ps_min: f64,
    state: DdmState,
    drifts: u64,
}

impl Default for Ddm {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Ddm {
    pub fn new(min_instances: u64) -> Self {
        Self {
            min_instances,
            warning_level: 2.0,
            drift_level: 3.0,
            n: 0,
            p: 0.0,
            p_min: f64::MAX,
            s_min: f64::MAX,
            ps_min: f64::MAX,
            state: DdmState::Stable,
            drifts: 0,
        }
    }

    pub fn with_warning_level(mut self, level: f64) -> Self {
        self.warning_level = level;
        self
    }

    pub fn with_drift_level(mut self, level: f64) -> Self {
        self.drift_level = level;
        self
    }

    pub fn state(&self) -> DdmState {
        self.state
    }

    pub fn in_warning(&self) -> bool {
        self.state == DdmState::Warning
    }

    /// Running error rate since the last drift.
    pub fn error_rate(&self) -> f64 {
        self.p
    }

    pub fn drift_count(&self) -> u64 {
        self.drifts
    }

    fn reset_statistics(&mut self) {
        self.n = 0;
        self.p = 0.0;
        self.p_min = f64::MAX;
        self.s_min = f64::MAX;
        self.ps_min = f64::MAX;
    }
}

impl ChangeDetector for Ddm {
    fn observe(&mut self, signal: f64) {
        let error = signal.abs().min(1.0);
        self.n += 1;
        self.p += (error - self.p) / self.n as f64;
        let s = (self.p * (1.0 - self.p) / self.n as f64).sqrt();

        if self.n < self.min_instances {
            self.state = DdmState::Stable;
            return;
        }

        if self.p + s <= self.ps_min {
            self.p_min = self.p;
            self.s_min = s;
            self.ps_min = self.p + s;
        }

        if self.p + s > self.p_min + self.drift_level * self.s_min {
            self.state = DdmState::Drift;
            self.drifts += 1;
            self.reset_statistics();
        } else if self.p + s > self.p_min + self.warning_level * self.s_min {
            self.state = DdmState::Warning;
        } else {
            self.state = DdmState::Stable;
        }
    }

    fn change_detected(&self) -> bool {
        self.state == DdmState::Drift
    }

    fn fresh(&self) -> Box<dyn ChangeDetector> {
        Box::new(
            Ddm::new(self.min_instances)
                .with_warning_level(self.warning_level)
                .with_drift_level(self.drift_level),
        )
    }
}
