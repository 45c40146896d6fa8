//! Error handling for view models
//!
//! This module provides the error types raised while resolving, constructing
//! and rendering view models, together with user-friendly reporting for the
//! command line.
//!
//! # Architecture
//!
//! - [`ViewModelError`] - Enumerated failure cases owned by this crate
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Errors raised by user code (the `before`, render method and `after` hooks of a
//! [`ViewLogic`](crate::viewmodel::ViewLogic)) are plain [`anyhow::Error`] values.
//! They travel through [`ViewModel::render`](crate::viewmodel::ViewModel::render)
//! unmodified, so callers can downcast them back to their own types.
//!
//! # Examples
//!
//! ```rust,no_run
//! use viewmodel_cli::core::{ViewModelError, user_friendly_error};
//!
//! let error = anyhow::Error::from(ViewModelError::ViewModelNotFound {
//!     name: "View_User_Profile".to_string(),
//!     suggestions: vec!["View_User_Profiles".to_string()],
//! });
//!
//! let ctx = user_friendly_error(error);
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for view model operations
///
/// # Error Categories
///
/// ## Resolution
/// - [`ViewModelNotFound`] - No registered type for an identifier
/// - [`MethodNotFound`] - The render method is not callable on the type
///
/// ## Templates
/// - [`TemplateNotFound`] - The view factory has no template for a path
/// - [`TemplateRender`] - The template engine failed to render
///
/// ## Lifecycle
/// - [`ReentrantRender`] - A hook tried to render its own view model
///
/// ## Configuration
/// - [`ConfigError`] - Configuration values could not be used
///
/// [`ViewModelNotFound`]: ViewModelError::ViewModelNotFound
/// [`MethodNotFound`]: ViewModelError::MethodNotFound
/// [`TemplateNotFound`]: ViewModelError::TemplateNotFound
/// [`TemplateRender`]: ViewModelError::TemplateRender
/// [`ReentrantRender`]: ViewModelError::ReentrantRender
/// [`ConfigError`]: ViewModelError::ConfigError
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewModelError {
    /// No view model type could be resolved for an identifier
    ///
    /// Raised by the factory when neither the module-qualified class name nor the
    /// identifier itself is registered.
    ///
    /// # Fields
    /// - `name`: The conventional class name that was looked for (e.g. `View_User_Profile`)
    /// - `suggestions`: Registered class names close to the requested one
    #[error("ViewModel \"{name}\" could not be found.")]
    ViewModelNotFound {
        /// Conventional class name derived from the identifier
        name: String,
        /// Similar registered class names
        suggestions: Vec<String>,
    },

    /// The configured render method does not exist on the view model type
    #[error("ViewModel \"{class}\" has no render method named \"{method}\"")]
    MethodNotFound {
        /// Class name of the view model
        class: String,
        /// Requested method name
        method: String,
    },

    /// The view factory has no template for the requested path
    #[error("The requested view could not be found: {path}")]
    TemplateNotFound {
        /// Logical template path (e.g. `user/profile`)
        path: String,
    },

    /// The template engine failed while producing the final string
    #[error("Failed to render view '{path}': {message}")]
    TemplateRender {
        /// Logical template path
        path: String,
        /// Cleaned-up message from the template engine
        message: String,
    },

    /// A lifecycle hook attempted to render the view model that is running it
    #[error("ViewModel \"{class}\" is already rendering")]
    ReentrantRender {
        /// Class name of the view model
        class: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// Combines a [`ViewModelError`] with an optional suggestion and details so the
/// command line can explain what went wrong and what to try next.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ViewModelError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`ViewModelError`]
    #[must_use]
    pub const fn new(error: ViewModelError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions where possible
///
/// Known [`ViewModelError`] values anywhere in the cause chain get tailored
/// advice. TOML and I/O failures are recognised as configuration problems. Any
/// other error keeps its full `{:#}` chain in the details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(vm_error) = error.chain().find_map(|cause| cause.downcast_ref::<ViewModelError>()) {
        return create_error_context(vm_error.clone());
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(ViewModelError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your configuration file")
        .with_details("TOML parsing errors are usually caused by missing quotes or mismatched brackets");
    }

    if let Some(io_error) = error.chain().find_map(|cause| cause.downcast_ref::<std::io::Error>()) {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(ViewModelError::ConfigError {
                message: format!("{error:#}"),
            })
            .with_suggestion("Check that the file or directory exists and the path is correct");
        }
    }

    ErrorContext::new(ViewModelError::ConfigError {
        message: error.to_string(),
    })
    .with_details(format!("{error:#}"))
}

fn create_error_context(error: ViewModelError) -> ErrorContext {
    match &error {
        ViewModelError::ViewModelNotFound {
            suggestions,
            ..
        } => {
            let ctx = ErrorContext::new(error.clone()).with_details(
                "View models are looked up by their module-qualified class name first, then by the identifier itself",
            );
            if suggestions.is_empty() {
                ctx.with_suggestion("Register the view model type before forging it")
            } else {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }
        ViewModelError::MethodNotFound {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Override ViewLogic::invoke to route additional method names, or use the default 'view' method",
        ),
        ViewModelError::TemplateNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the views directory and the configured template extension"),
        ViewModelError::TemplateRender {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the template syntax and that every variable it uses is set"),
        ViewModelError::ReentrantRender {
            ..
        } => ErrorContext::new(error)
            .with_details("Lifecycle hooks must not render the view model they belong to"),
        ViewModelError::ConfigError {
            ..
        } => ErrorContext::new(error),
    }
}
