//! Shared exposer state.
//!
//! Holds the exported registries plus an internal registry describing the
//! exposer itself. Cheap to clone (one `Arc`), so it doubles as axum state.

use std::sync::Arc;

use tally_core::{Collectable, Counter, FamilySnapshot, Histogram, Registry};

use crate::config::Format;

/// Request latency bounds, in microseconds.
const LATENCY_BOUNDS_US: [f64; 11] = [
    1.0, 10.0, 50.0, 100.0, 1_000.0, 5_000.0, 10_000.0, 50_000.0, 100_000.0, 500_000.0,
    10_000_000.0,
];

/// One rendered scrape.
#[derive(Debug, Clone)]
pub struct Scrape {
    pub content_type: &'static str,
    pub body: String,
}

#[derive(Clone)]
pub struct Exposer {
    inner: Arc<ExposerInner>,
}

struct ExposerInner {
    format: Format,
    exported: Registry,
    internal: Registry,
    bytes_transferred: Arc<Counter>,
    total_scrapes: Arc<Counter>,
    request_latencies: Arc<Histogram>,
}

impl Exposer {
    pub fn new(format: Format) -> Self {
        let internal = Registry::new();

        let bytes_transferred = internal
            .add_counter("exposer_bytes_transferred", "bytesTransferred to metrics services", &[])
            .add(&[]);
        let total_scrapes = internal
            .add_counter("exposer_total_scrapes", "Number of times metrics were scraped", &[])
            .add(&[]);
        let request_latencies = internal
            .add_histogram(
                "exposer_request_latencies",
                "Latencies of serving scrape requests, in microseconds",
                &[],
            )
            .add_with(&[], || Histogram::new(LATENCY_BOUNDS_US.to_vec()));

        Self {
            inner: Arc::new(ExposerInner {
                format,
                exported: Registry::new(),
                internal,
                bytes_transferred,
                total_scrapes,
                request_latencies,
            }),
        }
    }

    /// Export `collectable` (usually an `Arc<Registry>`) on every scrape.
    pub fn register_collectable(&self, collectable: Arc<dyn Collectable>) {
        self.inner.exported.register(collectable);
        tracing::debug!(count = self.inner.exported.len(), "collectable registered");
    }

    pub fn format(&self) -> Format {
        self.inner.format
    }

    /// Everything this exposer would export right now: registered
    /// collectables in order, then the exposer's own metrics.
    pub fn collect(&self) -> Vec<FamilySnapshot> {
        let mut families = self.inner.exported.collect();
        families.extend(self.inner.internal.collect());
        families
    }

    /// Collect and render one scrape, updating the self-metrics.
    pub fn scrape(&self) -> Scrape {
        let timer = self.inner.request_latencies.start_timer();

        let families = self.collect();
        let serializer = self.inner.format.serializer();
        let body = serializer.serialize(&families);

        self.inner.bytes_transferred.increment(body.len() as f64);
        self.inner.total_scrapes.inc();
        let micros = timer.observe_duration();
        tracing::debug!(families = families.len(), bytes = body.len(), micros, "scrape served");

        Scrape {
            content_type: serializer.content_type(),
            body,
        }
    }
}

impl Default for Exposer {
    fn default() -> Self {
        Self::new(Format::default())
    }
}
