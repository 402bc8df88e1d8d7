//! Numeric metric primitives.
//!
//! All update paths are lock-free: gauges and counters keep an `f64` as raw
//! bits in an `AtomicU64` and apply deltas with a compare-and-swap loop.
//! Histograms are a fixed vector of counters plus a running sum.

mod counter;
mod gauge;
mod histogram;

pub use counter::Counter;
pub use gauge::Gauge;
pub use histogram::{Histogram, HistogramTimer};

use crate::snapshot::{LabelPair, MetricSnapshot, MetricType};

/// A metric instance that can live inside a `Family`.
pub trait Metric: Send + Sync + 'static {
    /// `# TYPE` of families holding this metric.
    const TYPE: MetricType;

    /// Copy the current value out, tagged with the already-merged labels.
    fn collect(&self, labels: Vec<LabelPair>) -> MetricSnapshot;
}
