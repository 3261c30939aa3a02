//! Logging initialization using `tracing` and `tracing-subscriber`.

use tracing::info;
use tracing_subscriber::{fmt, util::SubscriberInitExt, EnvFilter};

use crate::session::SessionStats;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Initialize global tracing subscriber. Safe to call multiple times; subsequent
/// calls will no-op.
pub fn init_logging(format: LogFormat) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Human => {
            let _ = builder.finish().try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().finish().try_init();
        }
    };

    Ok(())
}

/// Emit dispatch counters for one session. Callers sample at natural points
/// (typically right before unbind) to keep log volume bounded.
pub fn log_session_metrics(protocol: &str, snapshot: SessionStats) {
    info!(
        target = "syncvio::session",
        protocol,
        ops_total = snapshot.ops_total,
        ops_failed = snapshot.ops_failed,
        handles_open = snapshot.handles_open,
        "session_dispatch_metrics"
    );
}
