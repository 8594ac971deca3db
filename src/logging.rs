//! Tracing subscriber setup for host applications

use tracing_subscriber::EnvFilter;

/// Install a stderr fmt subscriber filtered by `filter`.
///
/// `RUST_LOG` wins over `filter` when set. A second call is a no-op.
pub fn init_logging(filter: &str) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .try_init();
}
