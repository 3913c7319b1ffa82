//! Subscriber setup for programs built on this crate.
//!
//! The library only emits events. Simulation opens a `simulate` span and
//! logs each propagation pass at `trace`, with the pass number and whether
//! it made progress. The end of a run, with the pass count and any stalled
//! gates, is logged at `debug`. So are loads (path and circuit dimensions),
//! saves (path) and every answer interactive entry rejects.

use std::sync::OnceLock;

use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static INSTALL_GUARD: OnceLock<()> = OnceLock::new();

/// Prints the events above to stdout, filtered by `RUST_LOG` (default
/// `info`, so `RUST_LOG=trilogic=trace` shows every pass). Records from the
/// `log` crate are forwarded too. Calling this again, or after another
/// subscriber was installed, does nothing.
pub fn init_tracing() {
    INSTALL_GUARD.get_or_init(|| {
        // Err means a logger is already set; keep it.
        let _ = LogTracer::init();

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer()
            .with_timer(SystemTime)
            .with_target(true)
            .with_ansi(false)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
