//! Error handlers for failures that must not propagate.
//!
//! Converting a [`ViewModel`](crate::viewmodel::ViewModel) to a string cannot
//! fail, so errors raised while rendering in that position are handed to an
//! [`ErrorHandler`] and replaced by an empty string.

use super::error::{ViewModelError, user_friendly_error};

/// Receives errors swallowed at the stringification boundary.
pub trait ErrorHandler {
    /// Handle an error raised while rendering a view model for display.
    fn handle(&self, error: &anyhow::Error);
}

/// Default handler: logs the error through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingErrorHandler;

impl LoggingErrorHandler {
    /// Full cause chain of `error`, plus a suggestion when one is known.
    #[must_use]
    pub fn describe(error: &anyhow::Error) -> String {
        let suggestion = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<ViewModelError>())
            .and_then(|vm_error| {
                user_friendly_error(anyhow::Error::from(vm_error.clone())).suggestion
            });

        match suggestion {
            Some(suggestion) => format!("{error:#} ({suggestion})"),
            None => format!("{error:#}"),
        }
    }
}

impl ErrorHandler for LoggingErrorHandler {
    fn handle(&self, error: &anyhow::Error) {
        tracing::error!(error = %Self::describe(error), "View model rendering failed");
    }
}

impl<F> ErrorHandler for F
where
    F: Fn(&anyhow::Error),
{
    fn handle(&self, error: &anyhow::Error) {
        self(error);
    }
}
