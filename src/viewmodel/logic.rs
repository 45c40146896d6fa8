use anyhow::Result;

use super::model::ViewModel;
use crate::core::ViewModelError;

/// Render method used when a view model is forged without naming one.
pub const DEFAULT_METHOD: &str = "view";

/// Rendering logic of a concrete view model type.
///
/// Every hook receives the [`ViewModel`] it runs in, so implementations set
/// template variables through [`ViewModel::set`] and read them back with
/// [`ViewModel::get`]. All hooks default to doing nothing.
///
/// # Examples
///
/// ```rust
/// use anyhow::Result;
/// use viewmodel_cli::viewmodel::{ViewLogic, ViewModel};
///
/// struct Profile {
///     name: String,
/// }
///
/// impl ViewLogic for Profile {
///     fn view(&mut self, vm: &ViewModel) -> Result<()> {
///         vm.set_value("name", self.name.as_str());
///         Ok(())
///     }
/// }
/// ```
pub trait ViewLogic {
    /// Template to bind instead of the one derived from the class name.
    fn template_path(&self) -> Option<String> {
        None
    }

    /// Runs once while the view model is constructed.
    fn before(&mut self, _vm: &ViewModel) -> Result<()> {
        Ok(())
    }

    /// The default render method.
    fn view(&mut self, _vm: &ViewModel) -> Result<()> {
        Ok(())
    }

    /// Runs after the render method, before the template is stringified.
    fn after(&mut self, _vm: &ViewModel) -> Result<()> {
        Ok(())
    }

    /// Invoke a render method by name.
    ///
    /// Only [`DEFAULT_METHOD`] is known by default. Types offering other render
    /// methods route them here and fall back to this behaviour for the rest.
    fn invoke(&mut self, method: &str, vm: &ViewModel) -> Result<()> {
        match method {
            DEFAULT_METHOD => self.view(vm),
            _ => Err(ViewModelError::MethodNotFound {
                class: vm.class_name().to_string(),
                method: method.to_string(),
            }
            .into()),
        }
    }
}
