//! Label-indexed metric families.
//!
//! A `Family<T>` owns every instance of one metric name, keyed by an
//! order-independent hash of its label set:
//! - `hash -> instance` (creation order is kept for stable output)
//! - `instance pointer -> hash` (so `remove` only needs the handle)
//!
//! `add`, `remove`, and `collect` are serialized by one mutex per family.
//! The lock only covers bookkeeping and the copy-out in `collect`; metric
//! updates go straight to the lock-free primitives through the `Arc` handle.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::metric::Metric;
use crate::names::{is_valid_label_name, is_valid_metric_name};
use crate::snapshot::{FamilySnapshot, LabelPair, MetricDescriptor};

/// Anything that can produce snapshot fragments on demand.
///
/// Implemented by every `Family<T>` so a `Registry` can hold counters,
/// gauges, and histograms side by side.
pub trait Collectable: Send + Sync {
    fn collect(&self) -> Vec<FamilySnapshot>;
}

struct Entry<T> {
    hash: u64,
    labels: Vec<LabelPair>,
    metric: Arc<T>,
}

struct FamilyState<T> {
    next_seq: u64,
    /// creation seq -> entry
    entries: BTreeMap<u64, Entry<T>>,
    /// label hash -> creation seq
    by_hash: HashMap<u64, u64>,
    /// `Arc::as_ptr` address -> label hash
    by_ptr: HashMap<usize, u64>,
}

impl<T> Default for FamilyState<T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            entries: BTreeMap::new(),
            by_hash: HashMap::new(),
            by_ptr: HashMap::new(),
        }
    }
}

pub struct Family<T: Metric> {
    descriptor: MetricDescriptor,
    state: Mutex<FamilyState<T>>,
}

impl<T: Metric> Family<T> {
    /// Create an empty family. Names are checked with debug assertions; use
    /// the registry builders' `try_register` for a fallible path.
    pub fn new(name: &str, help: &str, constant_labels: &[(&str, &str)]) -> Self {
        debug_assert!(is_valid_metric_name(name), "invalid metric name: {name:?}");
        debug_assert_label_names(constant_labels);

        Self {
            descriptor: MetricDescriptor {
                name: name.to_string(),
                help: help.to_string(),
                kind: T::TYPE,
                constant_labels: to_pairs(constant_labels),
            },
            state: Mutex::new(FamilyState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn help(&self) -> &str {
        &self.descriptor.help
    }

    pub fn constant_labels(&self) -> &[LabelPair] {
        &self.descriptor.constant_labels
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.descriptor
    }

    /// Get or create the instance for `labels` using `T::default()`.
    pub fn add(&self, labels: &[(&str, &str)]) -> Arc<T>
    where
        T: Default,
    {
        self.add_with(labels, T::default)
    }

    /// Get or create the instance for `labels`. `make` only runs when the
    /// label set has never been seen (or was removed).
    ///
    /// Label order does not matter: `[("a","1"),("b","2")]` and
    /// `[("b","2"),("a","1")]` resolve to the same instance. Output keeps the
    /// order given on first insertion.
    pub fn add_with<F>(&self, labels: &[(&str, &str)], make: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        debug_assert_label_names(labels);
        debug_assert!(
            labels
                .iter()
                .all(|(name, _)| self.descriptor.constant_labels.iter().all(|c| c.name != *name)),
            "label name shadows a constant label in family {}: {:?}",
            self.descriptor.name,
            labels
        );

        let hash = hash_labels(labels);
        let mut state = self.lock();

        if let Some(seq) = state.by_hash.get(&hash).copied() {
            if let Some(entry) = state.entries.get(&seq) {
                let same = same_label_set(&entry.labels, labels);
                debug_assert!(
                    same,
                    "label hash collision in family {}: {:?} vs {:?}",
                    self.descriptor.name, entry.labels, labels
                );
                if !same {
                    tracing::error!(
                        family = %self.descriptor.name,
                        "label hash collision; returning existing instance"
                    );
                }
                return Arc::clone(&entry.metric);
            }
        }

        let metric = Arc::new(make());
        let seq = state.next_seq;
        state.next_seq += 1;
        state.by_hash.insert(hash, seq);
        state.by_ptr.insert(Arc::as_ptr(&metric) as usize, hash);
        state.entries.insert(
            seq,
            Entry {
                hash,
                labels: to_pairs(labels),
                metric: Arc::clone(&metric),
            },
        );
        tracing::debug!(family = %self.descriptor.name, ?labels, "metric instance created");
        metric
    }

    /// Drop `metric` from this family. Unknown (or already removed)
    /// instances are ignored. Handles held elsewhere stay valid but are no
    /// longer collected.
    pub fn remove(&self, metric: &Arc<T>) {
        let mut state = self.lock();
        let Some(hash) = state.by_ptr.remove(&(Arc::as_ptr(metric) as usize)) else {
            return;
        };
        if let Some(seq) = state.by_hash.remove(&hash) {
            if let Some(entry) = state.entries.remove(&seq) {
                debug_assert_eq!(entry.hash, hash);
                tracing::debug!(
                    family = %self.descriptor.name,
                    labels = ?entry.labels,
                    "metric instance removed"
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, FamilyState<T>> {
        // State is plain bookkeeping; a panic elsewhere must not stop scrapes.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Metric> Collectable for Family<T> {
    fn collect(&self) -> Vec<FamilySnapshot> {
        let state = self.lock();
        let metrics = state
            .entries
            .values()
            .map(|entry| {
                let mut labels =
                    Vec::with_capacity(self.descriptor.constant_labels.len() + entry.labels.len());
                labels.extend(self.descriptor.constant_labels.iter().cloned());
                labels.extend(entry.labels.iter().cloned());
                entry.metric.collect(labels)
            })
            .collect();

        vec![FamilySnapshot {
            name: self.descriptor.name.clone(),
            help: self.descriptor.help.clone(),
            kind: self.descriptor.kind,
            metrics,
        }]
    }
}

/// Deterministic, order-independent hash of a label set.
fn hash_labels(labels: &[(&str, &str)]) -> u64 {
    let mut sorted: Vec<&(&str, &str)> = labels.iter().collect();
    sorted.sort();
    let mut hasher = DefaultHasher::new();
    for (name, value) in sorted {
        name.hash(&mut hasher);
        value.hash(&mut hasher);
    }
    hasher.finish()
}

fn same_label_set(stored: &[LabelPair], requested: &[(&str, &str)]) -> bool {
    if stored.len() != requested.len() {
        return false;
    }
    let mut a: Vec<(&str, &str)> = stored
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();
    let mut b = requested.to_vec();
    a.sort();
    b.sort();
    a == b
}

fn to_pairs(labels: &[(&str, &str)]) -> Vec<LabelPair> {
    labels.iter().map(|(k, v)| LabelPair::new(*k, *v)).collect()
}

fn debug_assert_label_names(labels: &[(&str, &str)]) {
    if cfg!(debug_assertions) {
        for (i, (name, _)) in labels.iter().enumerate() {
            debug_assert!(is_valid_label_name(name), "invalid label name: {name:?}");
            debug_assert!(
                labels[..i].iter().all(|(other, _)| other != name),
                "duplicate label name: {name:?}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{Counter, Gauge, Histogram};
    use crate::snapshot::{MetricType, MetricValue};

    fn label_sets(f: &Family<Counter>) -> Vec<Vec<LabelPair>> {
        f.collect()[0].metrics.iter().map(|m| m.labels.clone()).collect()
    }

    #[test]
    fn same_pairs_any_order_same_instance() {
        let f: Family<Counter> = Family::new("requests_total", "", &[]);
        let a = f.add(&[("a", "1"), ("b", "2")]);
        let b = f.add(&[("b", "2"), ("a", "1")]);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn distinct_label_sets_distinct_instances() {
        let f: Family<Counter> = Family::new("requests_total", "", &[]);
        let a = f.add(&[("code", "200")]);
        let b = f.add(&[("code", "500")]);
        let c = f.add(&[]);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn value_split_across_pairs_does_not_alias() {
        let f: Family<Gauge> = Family::new("g", "", &[]);
        let a = f.add(&[("ab", "c")]);
        let b = f.add(&[("a", "bc")]);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn remove_only_drops_that_instance() {
        let f: Family<Counter> = Family::new("requests_total", "", &[]);
        let ok = f.add(&[("code", "200")]);
        let err = f.add(&[("code", "500")]);
        ok.increment(3.0);
        err.inc();

        f.remove(&err);
        let snaps = f.collect();
        assert_eq!(snaps[0].metrics.len(), 1);
        assert_eq!(snaps[0].metrics[0].labels, vec![LabelPair::new("code", "200")]);
        assert_eq!(snaps[0].metrics[0].value, MetricValue::Counter(3.0));
    }

    #[test]
    fn remove_unknown_or_twice_is_a_noop() {
        let f: Family<Counter> = Family::new("c", "", &[]);
        let other: Family<Counter> = Family::new("d", "", &[]);
        let foreign = other.add(&[]);
        let mine = f.add(&[("x", "1")]);

        f.remove(&foreign);
        f.remove(&mine);
        f.remove(&mine);
        assert!(f.is_empty());
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn re_add_after_remove_creates_fresh_instance() {
        let f: Family<Counter> = Family::new("c", "", &[]);
        let first = f.add(&[("x", "1")]);
        first.increment(10.0);
        f.remove(&first);
        let second = f.add(&[("x", "1")]);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.value(), 0.0);
    }

    #[test]
    fn constant_labels_come_first_then_declared_order() {
        let f: Family<Counter> = Family::new("c", "", &[("region", "eu"), ("az", "1")]);
        f.add(&[("z", "last"), ("m", "mid")]);
        assert_eq!(
            label_sets(&f),
            vec![vec![
                LabelPair::new("region", "eu"),
                LabelPair::new("az", "1"),
                LabelPair::new("z", "last"),
                LabelPair::new("m", "mid"),
            ]]
        );
    }

    #[test]
    fn collect_keeps_creation_order() {
        let f: Family<Counter> = Family::new("c", "", &[]);
        for i in 0..20 {
            let v = i.to_string();
            f.add(&[("i", v.as_str())]);
        }
        let order: Vec<String> = label_sets(&f)
            .into_iter()
            .map(|l| l[0].value.clone())
            .collect();
        let expected: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn collect_wraps_descriptor() {
        let f: Family<Histogram> = Family::new("latency", "Request latency", &[]);
        f.add_with(&[], || Histogram::new(vec![1.0]));
        let snaps = f.collect();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].name, "latency");
        assert_eq!(snaps[0].help, "Request latency");
        assert_eq!(snaps[0].kind, MetricType::Histogram);
    }

    #[test]
    fn add_with_constructor_runs_once() {
        let f: Family<Histogram> = Family::new("h", "", &[]);
        let mut calls = 0;
        let a = f.add_with(&[("k", "v")], || {
            calls += 1;
            Histogram::new(vec![1.0, 2.0])
        });
        let b = f.add_with(&[("k", "v")], || Histogram::new(vec![9.0]));
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.bounds(), &[1.0, 2.0]);
    }

    #[test]
    fn same_label_set_ignores_order_only() {
        let stored = vec![LabelPair::new("a", "1"), LabelPair::new("b", "2")];
        assert!(same_label_set(&stored, &[("b", "2"), ("a", "1")]));
        assert!(!same_label_set(&stored, &[("a", "1"), ("b", "3")]));
        assert!(!same_label_set(&stored, &[("a", "1")]));
        assert!(!same_label_set(&stored, &[("a", "1"), ("b", "2"), ("c", "3")]));
        assert!(same_label_set(&[], &[]));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invalid metric name")]
    fn invalid_metric_name_is_fatal_in_debug() {
        let _ = Family::<Counter>::new("9bad", "", &[]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invalid label name")]
    fn invalid_label_name_is_fatal_in_debug() {
        let f: Family<Counter> = Family::new("c", "", &[]);
        f.add(&[("bad-name", "x")]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invalid label name")]
    fn reserved_label_prefix_is_fatal_in_debug() {
        let f: Family<Counter> = Family::new("c", "", &[]);
        f.add(&[("__x", "y")]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invalid label name")]
    fn invalid_constant_label_is_fatal_in_debug() {
        let _ = Family::<Counter>::new("c", "", &[("0k", "v")]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "duplicate label name")]
    fn duplicate_label_name_is_fatal_in_debug() {
        let f: Family<Counter> = Family::new("c", "", &[]);
        f.add(&[("a", "1"), ("a", "2")]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "shadows a constant label")]
    fn instance_label_shadowing_constant_is_fatal_in_debug() {
        let f: Family<Counter> = Family::new("c", "", &[("a", "1")]);
        f.add(&[("a", "2")]);
    }

    #[test]
    fn order_independent_hash() {
        assert_eq!(
            hash_labels(&[("a", "1"), ("b", "2")]),
            hash_labels(&[("b", "2"), ("a", "1")])
        );
        assert_ne!(hash_labels(&[("a", "1")]), hash_labels(&[("a", "2")]));
    }
}
