//! Forging view models against templates on disk.

use anyhow::Result;
use viewmodel_cli::config::ConfigStore;
use viewmodel_cli::core::ViewModelError;
use viewmodel_cli::request::{Request, ResponseBody};
use viewmodel_cli::test_utils::init_test_logging;
use viewmodel_cli::viewmodel::{ViewLogic, ViewModel, ViewModelFactory, ViewModelRegistry};

use crate::common::TestProject;

#[derive(Default)]
struct Profile;

impl ViewLogic for Profile {
    fn view(&mut self, vm: &ViewModel) -> Result<()> {
        vm.set_value("name", "Ann");
        Ok(())
    }
}

#[derive(Default)]
struct Sidebar;

impl ViewLogic for Sidebar {
    fn template_path(&self) -> Option<String> {
        Some("partials/sidebar".to_string())
    }

    fn view(&mut self, vm: &ViewModel) -> Result<()> {
        vm.set_value("items", vec!["a", "b"]);
        Ok(())
    }
}

fn project() -> Result<TestProject> {
    init_test_logging(None);
    let project = TestProject::new()?;
    project.add_template("user/profile", "Profile of {{ name }}")?;
    project.add_template("partials/sidebar", "{% for item in items %}[{{ item }}]{% endfor %}")?;
    Ok(project)
}

fn factory(project: &TestProject, registry: ViewModelRegistry) -> Result<ViewModelFactory> {
    Ok(ViewModelFactory::new(registry, project.views()?, ConfigStore::new()))
}

#[test]
fn test_module_qualified_class_wins() -> Result<()> {
    let project = project()?;
    let mut registry = ViewModelRegistry::new();
    registry.register_default::<Profile>("Blog\\View_User_Profile");
    registry.register_default::<Sidebar>("user/profile");
    let factory = factory(&project, registry)?;

    let mut request = Request::new("blog");
    let vm = factory.forge(&mut request, "user/profile")?;

    assert_eq!(vm.class_name(), "Blog\\View_User_Profile");
    assert_eq!(vm.render()?, "Profile of Ann");
    Ok(())
}

#[test]
fn test_identifier_used_as_class_name() -> Result<()> {
    let project = project()?;
    let mut registry = ViewModelRegistry::new();
    registry.register_default::<Sidebar>("Widgets\\Sidebar");
    let factory = factory(&project, registry)?;

    let mut request = Request::new("blog");
    let vm = factory.forge(&mut request, "\\Widgets\\Sidebar")?;

    assert_eq!(vm.class_name(), "Widgets\\Sidebar");
    assert_eq!(vm.template_path(), "partials/sidebar");
    assert_eq!(vm.render()?, "[a][b]");
    Ok(())
}

#[test]
fn test_unknown_identifier_suggests_close_names() -> Result<()> {
    let project = project()?;
    let mut registry = ViewModelRegistry::new();
    registry.register_default::<Profile>("View_User_Profile");
    let factory = factory(&project, registry)?;

    let mut request = Request::default();
    let err = factory.forge(&mut request, "user/profil").unwrap_err();

    match err.downcast_ref::<ViewModelError>() {
        Some(ViewModelError::ViewModelNotFound {
            name,
            suggestions,
        }) => {
            assert_eq!(name, "View_User_Profil");
            assert_eq!(suggestions, &vec!["View_User_Profile".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!request.response().has_body());
    Ok(())
}

#[test]
fn test_missing_template_fails_construction() -> Result<()> {
    let project = project()?;
    let mut registry = ViewModelRegistry::new();
    registry.register_default::<Profile>("View_Admin_Dashboard");
    let factory = factory(&project, registry)?;

    let mut request = Request::default();
    let err = factory.forge(&mut request, "admin/dashboard").unwrap_err();

    assert_eq!(
        err.to_string(),
        "The requested view could not be found: admin/dashboard"
    );
    Ok(())
}

#[test]
fn test_first_view_model_becomes_response_body() -> Result<()> {
    let project = project()?;
    let mut registry = ViewModelRegistry::new();
    registry.register_default::<Profile>("View_User_Profile");
    registry.register_default::<Sidebar>("View_Sidebar");
    let factory = factory(&project, registry)?;

    let mut request = Request::default();
    let first = factory.forge(&mut request, "user/profile")?;
    let second = factory.forge(&mut request, "sidebar")?;

    match request.response().body() {
        Some(ResponseBody::ViewModel(body)) => {
            assert!(body.ptr_eq(&first));
            assert!(!body.ptr_eq(&second));
        }
        other => panic!("unexpected body: {other:?}"),
    }
    assert_eq!(request.response().render_body(), "Profile of Ann");
    Ok(())
}

#[test]
fn test_existing_text_body_is_kept() -> Result<()> {
    let project = project()?;
    let mut registry = ViewModelRegistry::new();
    registry.register_default::<Profile>("View_User_Profile");
    let factory = factory(&project, registry)?;

    let mut request = Request::default();
    request.response_mut().set_body("cached page");
    factory.forge(&mut request, "user/profile")?;

    assert_eq!(request.response().render_body(), "cached page");
    Ok(())
}

#[test]
fn test_views_path_from_config() -> Result<()> {
    init_test_logging(None);
    let project = TestProject::new()?;
    project.write_file("templates/home.tpl", "Welcome {{ name }}")?;
    let config = ConfigStore::from_toml_str("[views]\npath = \"templates\"\nextension = \"tpl\"\n")?;
    let views = viewmodel_cli::view::TeraViewFactory::from_config(&config, project.path())?;

    let mut registry = ViewModelRegistry::new();
    registry.register_default::<Profile>("View_Home");
    let factory = ViewModelFactory::new(registry, views, config);

    let mut request = Request::default();
    assert_eq!(factory.forge(&mut request, "home")?.render()?, "Welcome Ann");
    Ok(())
}
