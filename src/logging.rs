use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default filter, which is `warn`, or
/// `warn,bfbool=debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "warn,bfbool=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
