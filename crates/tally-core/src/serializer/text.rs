//! Text exposition format (`text/plain; version=0.0.4`).
//!
//! ```text
//! # HELP <name> <help>
//! # TYPE <name> <type>
//! <name>[_suffix]{k="v",...} <value>[ <timestamp_ms>]
//! ```
//! Histograms render `_count`, `_sum`, then cumulative `_bucket` lines with an
//! `le` label. Summaries render `_count`, `_sum`, then `_quantile` lines.

use std::borrow::Cow;
use std::fmt::Write;

use crate::snapshot::{
    format_float, FamilySnapshot, HistogramValue, MetricSnapshot, MetricValue, SummaryValue,
};

use super::Serializer;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextSerializer;

impl TextSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for TextSerializer {
    fn serialize(&self, families: &[FamilySnapshot]) -> String {
        let mut out = String::new();
        for family in families {
            write_family(&mut out, family);
        }
        out
    }

    fn content_type(&self) -> &'static str {
        "text/plain; version=0.0.4; charset=utf-8"
    }
}

/// Escape a label value: `\` -> `\\`, `"` -> `\"`, newline -> `\` + newline.
pub fn escape_label_value(v: &str) -> Cow<'_, str> {
    if !v.contains(|c: char| matches!(c, '\\' | '"' | '\n')) {
        return Cow::Borrowed(v);
    }
    let mut s = String::with_capacity(v.len() + 2);
    for c in v.chars() {
        match c {
            '\\' => s.push_str("\\\\"),
            '"' => s.push_str("\\\""),
            '\n' => s.push_str("\\\n"),
            c => s.push(c),
        }
    }
    Cow::Owned(s)
}

fn write_family(out: &mut String, family: &FamilySnapshot) {
    if !family.help.is_empty() {
        let _ = writeln!(out, "# HELP {} {}", family.name, family.help);
    }
    let _ = writeln!(out, "# TYPE {} {}", family.name, family.kind.as_str());

    for metric in &family.metrics {
        match &metric.value {
            MetricValue::Counter(v) | MetricValue::Gauge(v) | MetricValue::Untyped(v) => {
                write_head(out, &family.name, metric, "", None);
                out.push_str(&format_float(*v));
                write_tail(out, metric);
            }
            MetricValue::Summary(s) => write_summary(out, &family.name, metric, s),
            MetricValue::Histogram(h) => write_histogram(out, &family.name, metric, h),
        }
    }
}

fn write_summary(out: &mut String, name: &str, metric: &MetricSnapshot, s: &SummaryValue) {
    write_head(out, name, metric, "_count", None);
    let _ = write!(out, "{}", s.sample_count);
    write_tail(out, metric);

    write_head(out, name, metric, "_sum", None);
    out.push_str(&format_float(s.sample_sum));
    write_tail(out, metric);

    for q in &s.quantiles {
        let label = format_float(q.quantile);
        write_head(out, name, metric, "_quantile", Some(("quantile", &label)));
        out.push_str(&format_float(q.value));
        write_tail(out, metric);
    }
}

fn write_histogram(out: &mut String, name: &str, metric: &MetricSnapshot, h: &HistogramValue) {
    write_head(out, name, metric, "_count", None);
    let _ = write!(out, "{}", h.sample_count);
    write_tail(out, metric);

    write_head(out, name, metric, "_sum", None);
    out.push_str(&format_float(h.sample_sum));
    write_tail(out, metric);

    let mut last = f64::NEG_INFINITY;
    for b in &h.buckets {
        let le = format_float(b.upper_bound);
        write_head(out, name, metric, "_bucket", Some(("le", &le)));
        let _ = write!(out, "{}", b.cumulative_count);
        write_tail(out, metric);
        last = b.upper_bound;
    }

    if last != f64::INFINITY {
        write_head(out, name, metric, "_bucket", Some(("le", "+Inf")));
        let _ = write!(out, "{}", h.sample_count);
        write_tail(out, metric);
    }
}

/// `<name><suffix>{labels} ` (label block omitted when empty).
fn write_head(
    out: &mut String,
    name: &str,
    metric: &MetricSnapshot,
    suffix: &str,
    extra: Option<(&str, &str)>,
) {
    out.push_str(name);
    out.push_str(suffix);
    if !metric.labels.is_empty() || extra.is_some() {
        out.push('{');
        let mut sep = "";
        for lp in &metric.labels {
            let _ = write!(out, "{sep}{}=\"{}\"", lp.name, escape_label_value(&lp.value));
            sep = ",";
        }
        if let Some((k, v)) = extra {
            let _ = write!(out, "{sep}{k}=\"{}\"", escape_label_value(v));
        }
        out.push('}');
    }
    out.push(' ');
}

fn write_tail(out: &mut String, metric: &MetricSnapshot) {
    if metric.timestamp_ms != 0 {
        let _ = write!(out, " {}", metric.timestamp_ms);
    }
    out.push('\n');
}
