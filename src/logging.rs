//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_directive`. Output goes to stderr so
/// stdout stays free for state dumps.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

/// Directive to use when the config asks for update or state logging.
pub fn default_directive(log_updates: bool, log_states: bool) -> &'static str {
    if log_states {
        "info,lookaround=trace"
    } else if log_updates {
        "info,lookaround=debug"
    } else {
        "info"
    }
}
