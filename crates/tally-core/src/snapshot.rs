//! Point-in-time snapshot model produced by `collect`.
//!
//! Snapshots are plain owned data: they hold no reference back to live
//! metric state, so a scrape can collect on one thread and render on another.
//! Every type here is `serde`-enabled; non-finite floats travel as the
//! exposition strings `+Inf`, `-Inf`, and `Nan` because JSON has no encoding
//! for them.

use serde::{Deserialize, Serialize};

/// Metric kind, rendered as the `# TYPE` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    Untyped,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Histogram => "histogram",
            MetricType::Summary => "summary",
            MetricType::Untyped => "untyped",
        }
    }
}

/// Immutable description of a family, fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    pub name: String,
    pub help: String,
    #[serde(rename = "type")]
    pub kind: MetricType,
    #[serde(default)]
    pub constant_labels: Vec<LabelPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPair {
    pub name: String,
    pub value: String,
}

impl LabelPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One family as seen by a single `collect` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySnapshot {
    pub name: String,
    #[serde(default)]
    pub help: String,
    #[serde(rename = "type")]
    pub kind: MetricType,
    #[serde(default)]
    pub metrics: Vec<MetricSnapshot>,
}

/// One metric instance: merged labels (constant first) plus its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    #[serde(default)]
    pub labels: Vec<LabelPair>,
    pub value: MetricValue,
    /// Milliseconds since the epoch; `0` means "no timestamp".
    #[serde(default)]
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricValue {
    Counter(#[serde(with = "float_repr")] f64),
    Gauge(#[serde(with = "float_repr")] f64),
    Untyped(#[serde(with = "float_repr")] f64),
    Summary(SummaryValue),
    Histogram(HistogramValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramValue {
    pub sample_count: u64,
    #[serde(with = "float_repr")]
    pub sample_sum: f64,
    /// Cumulative counts in ascending bound order.
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(with = "float_repr")]
    pub upper_bound: f64,
    pub cumulative_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryValue {
    pub sample_count: u64,
    #[serde(with = "float_repr")]
    pub sample_sum: f64,
    #[serde(default)]
    pub quantiles: Vec<Quantile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantile {
    #[serde(with = "float_repr")]
    pub quantile: f64,
    #[serde(with = "float_repr")]
    pub value: f64,
}

/// Format a float the way the exposition format expects.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "Nan".to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-Inf" } else { "+Inf" }.to_string();
    }
    v.to_string()
}

mod float_repr {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_f64(*v)
        } else {
            s.serialize_str(&super::format_float(*v))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Repr::deserialize(d)? {
            Repr::Num(v) => Ok(v),
            Repr::Text(t) => match t.as_str() {
                "+Inf" | "Inf" => Ok(f64::INFINITY),
                "-Inf" => Ok(f64::NEG_INFINITY),
                "Nan" | "NaN" => Ok(f64::NAN),
                other => other
                    .parse::<f64>()
                    .map_err(|_| de::Error::custom(format!("not a float: {other}"))),
            },
        }
    }
}
