use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Sends diagnostics to stderr so they never interleave with the form on
/// stdout. `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) {
    let default_filter = format!("allocation={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init();

    if let Err(e) = installed {
        eprintln!("Warning: logging already initialized: {e}");
    }
}
