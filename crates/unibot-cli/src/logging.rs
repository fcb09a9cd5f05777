//! Log setup. Logs go to a daily file so they never interleave with the REPL.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use unibot_infrastructure::UnibotPaths;

const LOG_ENV: &str = "UNIBOT_LOG";
const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber. The returned guard flushes the file
/// writer on drop and must live until the process exits.
pub fn init() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    match UnibotPaths::log_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "unibot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        Err(_) => {
            // No config directory: keep only warnings, on stderr.
            tracing_subscriber::registry()
                .with(EnvFilter::new("warn"))
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}
