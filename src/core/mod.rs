//! Core types shared by every layer of the crate.
//!
//! - [`error`] - The [`ViewModelError`] enum and user-friendly reporting
//! - [`handler`] - [`ErrorHandler`] implementations used when rendering for display

pub mod error;
pub mod handler;

pub use error::{ErrorContext, ViewModelError, user_friendly_error};
pub use handler::{ErrorHandler, LoggingErrorHandler};
