//! tally exposer binary.
//!
//! Reads `tally.yaml` (or the path in `TALLY_CONFIG`), exports a process
//! registry, and serves it until Ctrl-C.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use tally_core::Registry;
use tally_exposer::{config, router, Exposer};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = config::config_path();
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, kind = e.kind().as_str(), "config load failed");
            std::process::exit(2);
        }
    };
    let listen = cfg
        .exposer
        .listen_addr()
        .expect("listen address already validated");

    let registry = Arc::new(Registry::new());
    registry
        .add_gauge("process_start_time_seconds", "Start time of the process since unix epoch in seconds", &[])
        .add(&[])
        .set_to_current_time();

    let exposer = Exposer::new(cfg.exposer.format);
    exposer.register_collectable(registry);
    let app = router::build_router(exposer, &cfg.exposer.path);

    tracing::info!(%listen, path = %cfg.exposer.path, "tally-exposer starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .expect("server failed");
}
