//! Fluent family builders:
//!
//! ```
//! use tally_core::Registry;
//!
//! let registry = Registry::new();
//! let latency = registry
//!     .build_histogram()
//!     .name("function_call_latency")
//!     .help("Time spent in the function, in us")
//!     .label("component", "parser")
//!     .register();
//! latency
//!     .add_with(&[("name", "foo")], || tally_core::Histogram::new(vec![1.0, 10.0, 100.0]))
//!     .observe(4.0);
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::Result;
use crate::family::Family;
use crate::metric::Metric;
use crate::names::{validate_label_name, validate_metric_name};
use crate::registry::Registry;

#[must_use = "a builder does nothing until `register` is called"]
pub struct FamilyBuilder<'r, T: Metric> {
    registry: &'r Registry,
    name: String,
    help: String,
    labels: Vec<(String, String)>,
    _kind: PhantomData<fn() -> T>,
}

impl<'r, T: Metric> FamilyBuilder<'r, T> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            name: String::new(),
            help: String::new(),
            labels: Vec::new(),
            _kind: PhantomData,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Add one constant label.
    pub fn label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((name.into(), value.into()));
        self
    }

    /// Add several constant labels, keeping their order.
    pub fn labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Create the family. Invalid names trip a debug assertion.
    pub fn register(self) -> Arc<Family<T>> {
        let labels: Vec<(&str, &str)> = self
            .labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        self.registry.add_family(&self.name, &self.help, &labels)
    }

    /// Validate names first; nothing is registered on error.
    pub fn try_register(self) -> Result<Arc<Family<T>>> {
        validate_metric_name(&self.name)?;
        for (name, _) in &self.labels {
            validate_label_name(name)?;
        }
        Ok(self.register())
    }
}
