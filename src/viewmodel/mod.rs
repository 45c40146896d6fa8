//! View models: templates bound to the logic that fills them.
//!
//! # Lifecycle
//!
//! ```text
//! forge(identifier)
//!   └─ resolve class name        Blog\View_User_Profile, then the identifier itself
//!   └─ construct
//!        ├─ forge template       explicit path or derived from the class name
//!        ├─ resolve auto-filter  argument, config, default on
//!        ├─ before()
//!        └─ publish as response body if the request has none
//! render()
//!   ├─ <method>()                "view" unless another was requested
//!   ├─ after()
//!   └─ template to string
//! ```
//!
//! # Modules
//!
//! - `naming` - Class name and template path conventions
//! - `registry` - [`ViewModelRegistry`], class name to constructor map
//! - `logic` - [`ViewLogic`], the hooks a concrete view model implements
//! - `model` - [`ViewModel`], the bound instance
//! - `factory` - [`ViewModelFactory`], resolution and construction

mod factory;
mod logic;
mod model;
pub mod naming;
mod registry;

pub use factory::ViewModelFactory;
pub use logic::{DEFAULT_METHOD, ViewLogic};
pub use model::{RenderState, ViewModel};
pub use registry::ViewModelRegistry;
