//! Subscriber setup for binaries embedding stagecfg

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "STAGECFG_LOG";

/// Filter used when neither environment variable is set: stagecfg's own
/// load/save/teardown events at info, everything else at warn.
pub const DEFAULT_DIRECTIVES: &str = "warn,stagecfg_core=info,stagecfg_fs=info";

/// Install a compact stderr subscriber.
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .ok();
    let filter = build_filter(directives.as_deref())?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn build_filter(directives: Option<&str>) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(directives.unwrap_or(DEFAULT_DIRECTIVES))
}
