/// Initializes the tracing/logging infrastructure for the application.
///
/// This sets up structured logging using the `tracing` crate with
/// environment-based filtering: set `RUST_LOG` to control verbosity
/// (`info`, `debug`, `trace`, or per-crate directives such as
/// `RUST_LOG=board_app=debug`).
///
/// Call once, from the application entry point, before anything logs.
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
