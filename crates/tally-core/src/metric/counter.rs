use crate::snapshot::{LabelPair, MetricSnapshot, MetricType, MetricValue};

use super::{Gauge, Metric};

/// Monotonic counter. Forwards to an owned [`Gauge`] and only ever adds.
#[derive(Debug, Default)]
pub struct Counter {
    gauge: Gauge,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by one.
    pub fn inc(&self) {
        self.gauge.inc();
    }

    /// Increment by `value`; negative values are silently dropped.
    pub fn increment(&self, value: f64) {
        self.gauge.increment(value);
    }

    pub fn value(&self) -> f64 {
        self.gauge.value()
    }
}

impl Metric for Counter {
    const TYPE: MetricType = MetricType::Counter;

    fn collect(&self, labels: Vec<LabelPair>) -> MetricSnapshot {
        MetricSnapshot {
            labels,
            value: MetricValue::Counter(self.value()),
            timestamp_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up() {
        let c = Counter::new();
        c.inc();
        c.increment(2.5);
        assert_eq!(c.value(), 3.5);
    }

    #[test]
    fn negative_increment_is_a_noop() {
        let c = Counter::new();
        c.increment(5.0);
        c.increment(-1.0);
        c.increment(-1e9);
        assert_eq!(c.value(), 5.0);
    }

    #[test]
    fn collect_is_counter_typed() {
        let c = Counter::new();
        c.inc();
        let snap = c.collect(Vec::new());
        assert_eq!(snap.value, MetricValue::Counter(1.0));
        assert!(snap.labels.is_empty());
    }
}
