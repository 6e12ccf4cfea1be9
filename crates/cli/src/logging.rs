use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Used when `RUST_LOG` is unset or cannot be parsed.
const DEFAULT_FILTER: &str = "warn";

/// Send log output to stderr so that stdout carries only query results. The filter comes from
/// `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    // a subscriber may already be installed, e.g. when running under a test harness
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
