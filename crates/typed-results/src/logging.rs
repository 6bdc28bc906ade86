// crates/typed-results/src/logging.rs - logger collaborators handed to `execute`
use std::fmt;

use axum::http::StatusCode;

/// A category-scoped logger.
pub trait Logger: Send + Sync {
    fn info(&self, message: fmt::Arguments<'_>);

    /// The one record every typed result emits before touching the channel.
    fn writing_status_code(&self, status: StatusCode) {
        self.info(format_args!(
            "Writing result with status code {}",
            status.as_u16()
        ));
    }
}

/// Hands out loggers by category. Passed explicitly into `execute`.
pub trait LoggerFactory: Send + Sync {
    fn create_logger(&self, category: &'static str) -> Box<dyn Logger>;
}

impl<F> LoggerFactory for F
where
    F: Fn(&'static str) -> Box<dyn Logger> + Send + Sync,
{
    fn create_logger(&self, category: &'static str) -> Box<dyn Logger> {
        self(category)
    }
}

/// Default factory: every record becomes a `tracing` event with a
/// `category` field. Status records also carry `status_code`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggerFactory;

impl LoggerFactory for TracingLoggerFactory {
    fn create_logger(&self, category: &'static str) -> Box<dyn Logger> {
        Box::new(TracingLogger { category })
    }
}

#[derive(Debug)]
struct TracingLogger {
    category: &'static str,
}

impl Logger for TracingLogger {
    fn info(&self, message: fmt::Arguments<'_>) {
        tracing::info!(category = self.category, "{}", message);
    }

    fn writing_status_code(&self, status: StatusCode) {
        tracing::info!(
            category = self.category,
            status_code = status.as_u16(),
            "Writing result with status code {}",
            status.as_u16()
        );
    }
}
