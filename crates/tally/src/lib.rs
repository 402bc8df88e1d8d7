//! Top-level facade crate for tally.
//!
//! Re-exports the core metric types and the exposer so users can depend on a single crate.

pub mod core {
    pub use tally_core::*;
}

pub mod exposer {
    pub use tally_exposer::*;
}

pub use tally_core::{Counter, Family, Gauge, Histogram, Registry};
