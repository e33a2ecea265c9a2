use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or debug
/// output when `verbose` is set. Calling this twice keeps the first subscriber.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "ocm_support=debug" } else { "warn" }
}
