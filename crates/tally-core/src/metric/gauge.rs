use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::snapshot::{LabelPair, MetricSnapshot, MetricType, MetricValue};

use super::Metric;

/// A value that can go up and down.
///
/// `set` is last-writer-wins; `increment`/`decrement` accumulate through a
/// CAS retry loop so concurrent deltas are never lost.
#[derive(Debug)]
pub struct Gauge {
    bits: AtomicU64,
}

impl Default for Gauge {
    fn default() -> Self {
        Self::with_value(0.0)
    }
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Add `value`; negative arguments are ignored.
    pub fn increment(&self, value: f64) {
        if value < 0.0 {
            return;
        }
        self.change(value);
    }

    /// Subtract `value`; negative arguments are ignored.
    pub fn decrement(&self, value: f64) {
        if value < 0.0 {
            return;
        }
        self.change(-value);
    }

    pub fn inc(&self) {
        self.increment(1.0);
    }

    pub fn dec(&self) {
        self.decrement(1.0);
    }

    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Set to the current unix time in whole seconds.
    pub fn set_to_current_time(&self) {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.set(secs as f64);
    }

    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    fn change(&self, delta: f64) {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + delta).to_bits();
            match self.bits.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}

impl Metric for Gauge {
    const TYPE: MetricType = MetricType::Gauge;

    fn collect(&self, labels: Vec<LabelPair>) -> MetricSnapshot {
        MetricSnapshot {
            labels,
            value: MetricValue::Gauge(self.value()),
            timestamp_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(Gauge::new().value(), 0.0);
        assert_eq!(Gauge::with_value(2.5).value(), 2.5);
    }

    #[test]
    fn up_and_down() {
        let g = Gauge::new();
        g.inc();
        g.increment(4.0);
        g.dec();
        g.decrement(0.5);
        assert_eq!(g.value(), 3.5);
    }

    #[test]
    fn negative_deltas_are_ignored() {
        let g = Gauge::with_value(10.0);
        g.increment(-3.0);
        g.decrement(-3.0);
        assert_eq!(g.value(), 10.0);
    }

    #[test]
    fn set_overwrites() {
        let g = Gauge::new();
        g.increment(7.0);
        g.set(-1.25);
        assert_eq!(g.value(), -1.25);
    }

    #[test]
    fn current_time_is_recent() {
        let g = Gauge::new();
        g.set_to_current_time();
        // 2020-01-01T00:00:00Z
        assert!(g.value() > 1_577_836_800.0);
        assert_eq!(g.value().fract(), 0.0);
    }

    #[test]
    fn collect_copies_value() {
        let g = Gauge::with_value(3.0);
        let snap = g.collect(vec![LabelPair::new("a", "b")]);
        g.set(9.0);
        assert_eq!(snap.value, MetricValue::Gauge(3.0));
        assert_eq!(snap.labels, vec![LabelPair::new("a", "b")]);
        assert_eq!(snap.timestamp_ms, 0);
    }
}
