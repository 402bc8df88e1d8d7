//! JSON rendering of the snapshot model, for consumers that would rather not
//! parse the text format.

use crate::snapshot::FamilySnapshot;

use super::Serializer;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, families: &[FamilySnapshot]) -> String {
        // Snapshot types are plain data with string keys; this cannot fail.
        serde_json::to_string(families).unwrap_or_else(|e| {
            tracing::error!(error = %e, "json serialization failed");
            "[]".to_string()
        })
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{Histogram, Metric};
    use crate::snapshot::{MetricType, MetricValue};

    #[test]
    fn round_trips_histogram_with_inf_bound() {
        let h = Histogram::new(vec![1.0]);
        h.observe(0.5);
        h.observe(3.0);
        let families = vec![FamilySnapshot {
            name: "h".into(),
            help: String::new(),
            kind: MetricType::Histogram,
            metrics: vec![h.collect(Vec::new())],
        }];

        let body = JsonSerializer.serialize(&families);
        assert!(body.contains(r#""upper_bound":"+Inf""#));

        let back: Vec<FamilySnapshot> = serde_json::from_str(&body).unwrap();
        assert_eq!(back, families);
        match &back[0].metrics[0].value {
            MetricValue::Histogram(v) => assert_eq!(v.sample_count, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
