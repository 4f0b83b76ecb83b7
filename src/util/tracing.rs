use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>;

const DEFAULT_FILTER: &str = "helix_census=debug,reqwest=info,info";

/// Installs the global tracing registry: an env-filter (overridable via
/// `RUST_LOG`) and a fmt layer writing to stdout.
pub fn build_subscriber() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    Ok(())
}
