//! Call-scoped state threaded through a single load.

use crate::error::BindError;

/// Error accumulator for one load call.
///
/// Every recoverable failure is recorded here and logged; the load
/// continues with the remaining siblings or fields. The binder folds
/// the flag into its own error state when the call finishes.
pub struct LoadContext {
    errored: bool,
}

impl LoadContext {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { errored: false }
    }

    /// Record a non-fatal error: log it and set the flag.
    pub(crate) fn record(&mut self, err: &BindError) {
        self.errored = true;
        tracing::error!(error = %err, "bind error");
    }

    #[must_use]
    pub(crate) fn errored(&self) -> bool {
        self.errored
    }
}
