use std::time::Instant;

use crate::error::{Result, TallyError};
use crate::snapshot::{Bucket, HistogramValue, LabelPair, MetricSnapshot, MetricType, MetricValue};

use super::{Counter, Metric};

/// Fixed-bucket histogram.
///
/// `n` declared bounds give `n + 1` bucket counters (the last one is the
/// implicit `+Inf` bucket) and one counter for the running sum. Bounds never
/// change after construction.
///
/// The sum is a counter, so negative samples land in a bucket and raise the
/// count but leave the sum untouched.
///
/// `observe` touches a bucket counter and the sum counter separately, so a
/// concurrent `collect` may briefly see one update without the other. Both
/// converge as soon as the observation completes.
#[derive(Debug)]
pub struct Histogram {
    bounds: Vec<f64>,
    buckets: Vec<Counter>,
    sum: Counter,
}

impl Histogram {
    /// Build from strictly ascending bounds.
    ///
    /// Unsorted bounds are a programming error (debug assertion). A trailing
    /// `+Inf` bound is dropped since the implicit bucket already covers it.
    pub fn new(bounds: Vec<f64>) -> Self {
        debug_assert!(
            check_bounds(&bounds).is_ok(),
            "histogram bounds must be strictly ascending: {bounds:?}"
        );
        Self::build(bounds)
    }

    /// Checked variant of [`Histogram::new`].
    pub fn try_new(bounds: Vec<f64>) -> Result<Self> {
        check_bounds(&bounds)?;
        Ok(Self::build(bounds))
    }

    fn build(mut bounds: Vec<f64>) -> Self {
        if bounds.last() == Some(&f64::INFINITY) {
            bounds.pop();
        }
        let buckets = (0..=bounds.len()).map(|_| Counter::new()).collect();
        Self {
            bounds,
            buckets,
            sum: Counter::new(),
        }
    }

    /// Record one sample. A value equal to a bound lands in the next bucket
    /// up: the chosen bucket is the first bound strictly greater than `value`.
    pub fn observe(&self, value: f64) {
        // Linear scan beats binary search for typical (small) bucket counts.
        let idx = self
            .bounds
            .iter()
            .position(|&b| b > value)
            .unwrap_or(self.bounds.len());
        self.sum.increment(value);
        if let Some(bucket) = self.buckets.get(idx) {
            bucket.inc();
        }
    }

    /// Start a timer that observes elapsed microseconds when dropped.
    pub fn start_timer(&self) -> HistogramTimer<'_> {
        HistogramTimer {
            histogram: self,
            start: Instant::now(),
            armed: true,
        }
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn sample_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.value() as u64).sum()
    }

    pub fn sample_sum(&self) -> f64 {
        self.sum.value()
    }
}

fn check_bounds(bounds: &[f64]) -> Result<()> {
    if bounds.iter().any(|b| b.is_nan()) {
        return Err(TallyError::InvalidBuckets("NaN bound".into()));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(TallyError::InvalidBuckets(format!(
            "bounds must be strictly ascending: {bounds:?}"
        )));
    }
    Ok(())
}

impl Metric for Histogram {
    const TYPE: MetricType = MetricType::Histogram;

    fn collect(&self, labels: Vec<LabelPair>) -> MetricSnapshot {
        let mut cumulative = 0u64;
        let mut buckets = Vec::with_capacity(self.buckets.len());
        for (i, counter) in self.buckets.iter().enumerate() {
            cumulative += counter.value() as u64;
            let upper_bound = self.bounds.get(i).copied().unwrap_or(f64::INFINITY);
            buckets.push(Bucket {
                upper_bound,
                cumulative_count: cumulative,
            });
        }

        MetricSnapshot {
            labels,
            value: MetricValue::Histogram(HistogramValue {
                // Same pass as the buckets, so +Inf always equals the count.
                sample_count: cumulative,
                sample_sum: self.sum.value(),
                buckets,
            }),
            timestamp_ms: 0,
        }
    }
}

/// Scope guard returned by [`Histogram::start_timer`].
#[must_use = "dropping the timer immediately records ~0us"]
pub struct HistogramTimer<'a> {
    histogram: &'a Histogram,
    start: Instant,
    armed: bool,
}

impl HistogramTimer<'_> {
    /// Observe now instead of at drop. Returns the recorded microseconds.
    pub fn observe_duration(mut self) -> f64 {
        self.armed = false;
        self.record()
    }

    fn record(&self) -> f64 {
        let micros = self.start.elapsed().as_micros() as f64;
        self.histogram.observe(micros);
        micros
    }
}

impl Drop for HistogramTimer<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.record();
        }
    }
}
