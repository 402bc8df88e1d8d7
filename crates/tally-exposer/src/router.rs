//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{exposer::Exposer, ops};

pub fn build_router(exposer: Exposer, path: &str) -> Router {
    Router::new()
        .route(path, get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .with_state(exposer)
}
