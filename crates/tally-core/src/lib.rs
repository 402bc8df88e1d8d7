//! tally core: metric primitives, label-indexed families, registries, and
//! the exposition serializers.
//!
//! Instrumentation code holds `Arc` handles to counters, gauges, and
//! histograms and mutates them lock-free from any thread. A scrape calls
//! [`Registry::collect`] to obtain an owned, point-in-time snapshot and hands
//! it to a [`Serializer`]. The crate carries no transport or runtime
//! dependencies so it can sit under any exposer.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Contract
//! violations (bad metric names, unsorted buckets) are `debug_assert!`s, and
//! every checked entry point surfaces them as `TallyError` instead.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

pub mod builder;
pub mod error;
pub mod family;
pub mod metric;
pub mod names;
pub mod registry;
pub mod serializer;
pub mod snapshot;

pub use builder::FamilyBuilder;
pub use error::{Result, TallyError};
pub use family::{Collectable, Family};
pub use metric::{Counter, Gauge, Histogram, HistogramTimer, Metric};
pub use registry::Registry;
pub use serializer::{JsonSerializer, Serializer, TextSerializer};
pub use snapshot::{FamilySnapshot, MetricSnapshot, MetricType, MetricValue};
