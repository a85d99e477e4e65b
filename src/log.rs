//! Logging sink injected into [`crate::RestClient`].
//!
//! The client never looks for an ambient logger. It logs through whatever
//! [`Logger`] it was built with, [`TracingLogger`] unless replaced with
//! [`crate::RestClient::with_logger`].

use tracing::Level;

/// Receives the client's free-text log lines.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards to `tracing` under the `json_rest_client` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "json_rest_client", "{message}"),
            Level::WARN => tracing::warn!(target: "json_rest_client", "{message}"),
            Level::INFO => tracing::info!(target: "json_rest_client", "{message}"),
            Level::DEBUG => tracing::debug!(target: "json_rest_client", "{message}"),
            Level::TRACE => tracing::trace!(target: "json_rest_client", "{message}"),
        }
    }
}

impl<F> Logger for F
where
    F: Fn(Level, &str) + Send + Sync,
{
    fn log(&self, level: Level, message: &str) {
        self(level, message)
    }
}
