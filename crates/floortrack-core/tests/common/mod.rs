//! Shared test-only helpers for the integration suite.

/// Installs a test-scoped `tracing` subscriber so `debug!`/`info!` output
/// from the tracker and zone engine surfaces under `cargo test -- --nocapture`.
/// Safe to call from every test; only the first call in a process wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
