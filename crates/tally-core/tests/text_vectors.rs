//! Text exposition vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tally_core::{JsonSerializer, Serializer, TextSerializer};

mod vector_loader;
use vector_loader::load;

const VECTORS: [&str; 6] = [
    "gauge_unlabeled.json",
    "label_escaping.json",
    "histogram_cumulative.json",
    "histogram_missing_inf.json",
    "summary_quantiles.json",
    "multi_family_order.json",
];

#[test]
fn text_vectors() {
    for f in VECTORS {
        let v = load(f);
        let out = TextSerializer.serialize(&v.families);
        assert_eq!(out, v.expect, "vector={}", v.description);
    }
}

#[test]
fn json_rendering_preserves_text_output() {
    // JSON -> snapshot -> text must match rendering the loaded snapshot.
    for f in VECTORS {
        let v = load(f);
        let json = JsonSerializer.serialize(&v.families);
        let back: Vec<tally_core::FamilySnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            TextSerializer.serialize(&back),
            v.expect,
            "vector={}",
            v.description
        );
    }
}
