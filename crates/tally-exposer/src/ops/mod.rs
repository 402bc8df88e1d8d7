//! Operational HTTP endpoints.
//!
//! - `/healthz`         : liveness
//! - `<exposer.path>`   : scrape (text exposition or JSON)

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use crate::exposer::Exposer;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(exposer): State<Exposer>) -> Response {
    let scrape = exposer.scrape();
    (StatusCode::OK, [(CONTENT_TYPE, scrape.content_type)], scrape.body).into_response()
}
