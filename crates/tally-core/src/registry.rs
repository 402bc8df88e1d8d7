//! Registry: owns families (type-erased as `Collectable`) and fans out
//! `collect`.
//!
//! Locking policy: the registry mutex only guards the list of collectables.
//! `collect` clones the list under the lock, releases it, then collects each
//! family in registration order. Registering a family never waits on an
//! in-flight scrape's per-family work; the price is that families are
//! snapshotted one after another rather than at a single instant.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::builder::FamilyBuilder;
use crate::family::{Collectable, Family};
use crate::metric::{Counter, Gauge, Histogram, Metric};
use crate::snapshot::FamilySnapshot;

#[derive(Default)]
pub struct Registry {
    collectables: Mutex<Vec<Arc<dyn Collectable>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_counter(
        &self,
        name: &str,
        help: &str,
        constant_labels: &[(&str, &str)],
    ) -> Arc<Family<Counter>> {
        self.add_family(name, help, constant_labels)
    }

    pub fn add_gauge(
        &self,
        name: &str,
        help: &str,
        constant_labels: &[(&str, &str)],
    ) -> Arc<Family<Gauge>> {
        self.add_family(name, help, constant_labels)
    }

    pub fn add_histogram(
        &self,
        name: &str,
        help: &str,
        constant_labels: &[(&str, &str)],
    ) -> Arc<Family<Histogram>> {
        self.add_family(name, help, constant_labels)
    }

    /// Create and own a new family of any metric kind.
    pub fn add_family<T: Metric>(
        &self,
        name: &str,
        help: &str,
        constant_labels: &[(&str, &str)],
    ) -> Arc<Family<T>> {
        let family = Arc::new(Family::<T>::new(name, help, constant_labels));
        self.register(Arc::clone(&family) as Arc<dyn Collectable>);
        tracing::debug!(name, kind = T::TYPE.as_str(), "family registered");
        family
    }

    /// Own an arbitrary collectable (e.g. another registry).
    pub fn register(&self, collectable: Arc<dyn Collectable>) {
        self.lock().push(collectable);
    }

    pub fn build_counter(&self) -> FamilyBuilder<'_, Counter> {
        FamilyBuilder::new(self)
    }

    pub fn build_gauge(&self) -> FamilyBuilder<'_, Gauge> {
        FamilyBuilder::new(self)
    }

    pub fn build_histogram(&self) -> FamilyBuilder<'_, Histogram> {
        FamilyBuilder::new(self)
    }

    /// Number of owned collectables.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot every owned collectable, in registration order.
    pub fn collect(&self) -> Vec<FamilySnapshot> {
        let collectables: Vec<Arc<dyn Collectable>> = self.lock().clone();
        collectables.iter().flat_map(|c| c.collect()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn Collectable>>> {
        self.collectables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Collectable for Registry {
    fn collect(&self) -> Vec<FamilySnapshot> {
        Registry::collect(self)
    }
}
