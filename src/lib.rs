//! viewmodel - templates bound to the logic that fills them
//!
//! A view model pairs a template with a small piece of rendering logic. The
//! logic runs in three hooks (`before`, a render method, `after`) and sets
//! variables on the template; the template is then turned into a string.
//!
//! # Architecture Overview
//!
//! - View model types are registered by class name in a [`ViewModelRegistry`]
//!   and forged by identifier through a [`ViewModelFactory`]
//! - Identifiers resolve to a module-qualified class name first
//!   (`user/profile` in module `blog` -> `Blog\View_User_Profile`), then to the
//!   identifier itself
//! - The template is chosen by the view model or derived from its class name
//!   (`View_User_Profile` -> `user/profile`) and produced by a [`ViewFactory`]
//! - Values set on a view model are HTML-escaped at render time unless
//!   auto-filtering is switched off per call, per view model or in configuration
//! - The first view model forged for a [`Request`] becomes its response body
//!
//! # Core Modules
//!
//! - [`viewmodel`] - Registry, factory, lifecycle and the [`ViewModel`] handle
//! - [`view`] - Template objects and the Tera-backed view factory
//! - [`request`] - Request and response context passed to construction
//! - [`config`] - TOML configuration with dotted-key access
//! - [`core`] - Error types, user-friendly reporting and error handlers
//! - [`cli`] - The `vmrender` command-line interface
//!
//! # Example
//!
//! ```rust
//! use anyhow::Result;
//! use viewmodel_cli::config::ConfigStore;
//! use viewmodel_cli::request::Request;
//! use viewmodel_cli::view::TeraViewFactory;
//! use viewmodel_cli::viewmodel::{ViewLogic, ViewModel, ViewModelFactory, ViewModelRegistry};
//!
//! #[derive(Default)]
//! struct Greeting;
//!
//! impl ViewLogic for Greeting {
//!     fn view(&mut self, vm: &ViewModel) -> Result<()> {
//!         vm.set_value("name", "World");
//!         Ok(())
//!     }
//! }
//!
//! # fn example() -> Result<()> {
//! let mut registry = ViewModelRegistry::new();
//! registry.register_default::<Greeting>("View_Greeting");
//!
//! let views = TeraViewFactory::from_templates([("greeting", "Hello {{ name }}!")], "html")?;
//! let factory = ViewModelFactory::new(registry, views, ConfigStore::new());
//!
//! let mut request = Request::default();
//! let vm = factory.forge(&mut request, "greeting")?;
//! assert_eq!(vm.to_string(), "Hello World!");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! [`ViewModelRegistry`]: viewmodel::ViewModelRegistry
//! [`ViewModelFactory`]: viewmodel::ViewModelFactory
//! [`ViewModel`]: viewmodel::ViewModel
//! [`ViewFactory`]: view::ViewFactory
//! [`Request`]: request::Request

pub mod cli;
pub mod config;
pub mod core;
pub mod request;
pub mod view;
pub mod viewmodel;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
