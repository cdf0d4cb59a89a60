//! Logging setup.
//!
//! Library code logs with `tracing` macros; binaries call [`init_logging`]
//! once to print them on stderr. `log` records from dependencies are
//! forwarded to tracing as well.
//!
//! The filter is read from `RUST_LOG` and defaults to `info`.

use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the stderr subscriber and the `log` bridge.
///
/// Calling it again is a no-op, as is calling it after another global
/// subscriber was installed.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        tracing_log::LogTracer::init().ok();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}
