//! JSON exposition vector loader shared by serializer tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::Deserialize;
use tally_core::FamilySnapshot;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub families: Vec<FamilySnapshot>,
    pub expect: String,
}

pub fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap_or_else(|e| panic!("vector {name}: {e}"))
}
