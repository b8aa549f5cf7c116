use crate::ErrorReporting;

/// Reports errors by logging them.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ErrorReporting for TracingReporter {
    fn report(&self, error: &anyhow::Error) {
        tracing::error!(?error, "unexpected error");
    }
}
