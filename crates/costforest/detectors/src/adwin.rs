//! ADWIN (ADaptive WINdowing).
//!
//! Keeps a variable-length window over the error stream, compressed into
//! an exponential histogram of buckets, and drops the oldest part of the
//! window whenever two sub-windows have averages that differ by more than
//! a Hoeffding-style bound.
//!
//! Reference: Bifet, A. and Gavaldà, R., 2007. Learning from time-changing
//! data with adaptive windowing. SIAM International Conference on Data Mining.

use costforest_types::ChangeDetector;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct Bucket {
    total: f64,
    variance: f64,
    count: u64,
}

impl Bucket {
    fn merge(older: &Bucket, newer: &Bucket) -> Bucket {
        let n0 = older.count as f64;
        let n1 = newer.count as f64;
        let diff = older.total / n0 - newer.total / n1;
        Bucket {
            total: older.total + newer.total,
            variance: older.variance + newer.variance + n0 * n1 * diff * diff / (n0 + n1),
            count: older.count + newer.count,
        }
    }
}

/// ADWIN change detector.
#[derive(Debug, Clone)]
pub struct Adwin {
    delta: f64,
    /// Row `i` holds buckets of `2^i` observations, newest at the front.
    rows: Vec<VecDeque<Bucket>>,
    total: f64,
    variance: f64,
    width: u64,
    observations: u64,
    max_buckets: usize,
    check_every: u64,
    min_window: u64,
    min_sub_window: u64,
    change: bool,
    detections: u64,
}

impl Default for Adwin {
    fn default() -> Self {
        Self::new(0.002)
    }
}

impl Adwin {
    /// `delta` is the confidence parameter: smaller means fewer false alarms.
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            rows: Vec::new(),
            total: 0.0,
            variance: 0.0,
            width: 0,
            observations: 0,
            max_buckets: 5,
            check_every: 32,
            min_window: 30,
            min_sub_window: 5,
            change: false,
            detections: 0,
        }
    }

    /// Scan for cuts every `n` observations (default 32).
    pub fn with_check_every(mut self, n: u64) -> Self {
        self.check_every = n.max(1);
        self
    }

    /// Minimum window width before any cut is considered (default 30).
    pub fn with_min_window(mut self, n: u64) -> Self {
        self.min_window = n;
        self
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Current window width in observations.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Mean of the current window.
    pub fn mean(&self) -> f64 {
        if self.width == 0 {
            0.0
        } else {
            self.total / self.width as f64
        }
    }

    pub fn variance(&self) -> f64 {
        if self.width == 0 {
            0.0
        } else {
            self.variance / self.width as f64
        }
    }

    /// Changes detected over this detector's lifetime.
    pub fn detections(&self) -> u64 {
        self.detections
    }

    fn blank(&self) -> Self {
        Self {
            max_buckets: self.max_buckets,
            check_every: self.check_every,
            min_window: self.min_window,
            min_sub_window: self.min_sub_window,
            ..Self::new(self.delta)
        }
    }

    fn insert(&mut self, value: f64) {
        self.width += 1;
        let w = self.width as f64;
        if self.width > 1 {
            let prev_mean = self.total / (w - 1.0);
            self.variance += (w - 1.0) * (value - prev_mean).powi(2) / w;
        }
        self.total += value;

        if self.rows.is_empty() {
            self.rows.push(VecDeque::new());
        }
        self.rows[0].push_front(Bucket {
            total: value,
            variance: 0.0,
            count: 1,
        });
        self.compress();
    }

    /// Merge the two oldest buckets of any overfull row into the next row.
    fn compress(&mut self) {
        let mut level = 0;
        while level < self.rows.len() && self.rows[level].len() > self.max_buckets.max(1) {
            let (older, newer) = match (self.rows[level].pop_back(), self.rows[level].pop_back()) {
                (Some(older), Some(newer)) => (older, newer),
                (Some(single), None) => {
                    self.rows[level].push_back(single);
                    break;
                }
                _ => break,
            };
            if level + 1 == self.rows.len() {
                self.rows.push(VecDeque::new());
            }
            self.rows[level + 1].push_front(Bucket::merge(&older, &newer));
            level += 1;
        }
    }

    /// Whether some split of the window into old/new halves shows a change.
    fn has_cut(&self) -> bool {
        let n = self.width as f64;
        let ln_term = (4.0 * n / self.delta).ln();
        let min_sub = self.min_sub_window as f64;
        let (mut n0, mut s0) = (0.0_f64, 0.0_f64);

        // Walk from the oldest bucket to the newest.
        for row in self.rows.iter().rev() {
            for bucket in row.iter().rev() {
                n0 += bucket.count as f64;
                s0 += bucket.total;
                let n1 = n - n0;
                if n1 < min_sub {
                    return false;
                }
                if n0 < min_sub {
                    continue;
                }
                let s1 = self.total - s0;
                let m = 1.0 / (1.0 / n0 + 1.0 / n1);
                let eps = (ln_term / (2.0 * m)).sqrt();
                if (s0 / n0 - s1 / n1).abs() > eps {
                    return true;
                }
            }
        }
        false
    }

    fn drop_oldest(&mut self) -> bool {
        let Some(row) = self.rows.iter_mut().rev().find(|r| !r.is_empty()) else {
            return false;
        };
        let Some(bucket) = row.pop_back() else {
            return false;
        };

        let n1 = bucket.count as f64;
        let w = self.width as f64;
        let rest = w - n1;
        if rest <= 0.0 {
            self.rows.clear();
            self.total = 0.0;
            self.variance = 0.0;
            self.width = 0;
            return true;
        }
        let mu1 = bucket.total / n1;
        let mu2 = (self.total - bucket.total) / rest;
        self.variance -= bucket.variance + n1 * rest * (mu1 - mu2).powi(2) / w;
        self.variance = self.variance.max(0.0);
        self.total -= bucket.total;
        self.width -= bucket.count;

        while matches!(self.rows.last(), Some(r) if r.is_empty()) {
            self.rows.pop();
        }
        true
    }

    /// Drop old buckets while a cut exists. Returns whether any cut was found.
    fn shrink_while_cut(&mut self) -> bool {
        let mut cut = false;
        while self.width > self.min_window && self.has_cut() {
            cut = true;
            if !self.drop_oldest() {
                break;
            }
        }
        cut
    }
}

impl ChangeDetector for Adwin {
    fn observe(&mut self, signal: f64) {
        self.change = false;
        self.insert(signal);
        self.observations += 1;

        if self.observations % self.check_every == 0
            && self.width > self.min_window
            && self.shrink_while_cut()
        {
            self.change = true;
            self.detections += 1;
        }
    }

    fn change_detected(&self) -> bool {
        self.change
    }

    fn fresh(&self) -> Box<dyn ChangeDetector> {
        Box::new(self.blank())
    }
}
