//! tally exposer: serves registries over HTTP for a scraper.
//!
//! The exposer owns the registries it exports, drives
//! `collect` + `serialize` per request, and instruments itself (bytes sent,
//! scrape count, scrape latency) with the same primitives it exports.

pub mod config;
pub mod exposer;
pub mod ops;
pub mod router;

pub use exposer::{Exposer, Scrape};
