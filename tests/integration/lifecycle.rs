//! Hook order, variables and error handling with real templates.

use anyhow::{Result, bail};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use viewmodel_cli::config::{AUTO_FILTER_KEY, ConfigStore};
use viewmodel_cli::core::{ErrorHandler, ViewModelError};
use viewmodel_cli::request::Request;
use viewmodel_cli::test_utils::{CallLog, RecordingLogic, init_test_logging};
use viewmodel_cli::view::TeraViewFactory;
use viewmodel_cli::viewmodel::{RenderState, ViewLogic, ViewModel, ViewModelFactory, ViewModelRegistry};

/// Sets a title in `before`, a body in the render method and wraps the title
/// in `after`.
struct Article {
    log: CallLog,
}

impl ViewLogic for Article {
    fn before(&mut self, vm: &ViewModel) -> Result<()> {
        self.log.push("before");
        vm.set_value("title", "Rust & Templates");
        Ok(())
    }

    fn view(&mut self, vm: &ViewModel) -> Result<()> {
        self.log.push("view");
        vm.set("body", "<p>Hello</p>", Some(false));
        Ok(())
    }

    fn after(&mut self, vm: &ViewModel) -> Result<()> {
        self.log.push("after");
        let title = vm.get("title").and_then(|v| v.as_str().map(str::to_uppercase));
        if let Some(title) = title {
            vm.set_value("title", title);
        }
        Ok(())
    }

    fn invoke(&mut self, method: &str, vm: &ViewModel) -> Result<()> {
        match method {
            "view" => self.view(vm),
            "summary" => {
                self.log.push("summary");
                vm.set_value("body", "(summary)");
                Ok(())
            }
            _ => Err(ViewModelError::MethodNotFound {
                class: vm.class_name().to_string(),
                method: method.to_string(),
            }
            .into()),
        }
    }
}

/// Fails in the render method.
#[derive(Default)]
struct Broken;

impl ViewLogic for Broken {
    fn view(&mut self, _vm: &ViewModel) -> Result<()> {
        bail!("database unavailable")
    }
}

fn factory(log: &CallLog, config: ConfigStore) -> Result<ViewModelFactory> {
    init_test_logging(None);
    let views = TeraViewFactory::from_templates(
        [
            ("article", "<h1>{{ title }}</h1>{{ body }}"),
            ("broken", "never shown"),
            ("strict", "{{ missing }}"),
            ("home", "{{ greeting }}"),
        ],
        "html",
    )?;

    let mut registry = ViewModelRegistry::new();
    let article_log = log.clone();
    registry.register("View_Article", move || Article {
        log: article_log.clone(),
    });
    registry.register_default::<Broken>("View_Broken");
    let strict_log = log.clone();
    registry.register("View_Strict", move || RecordingLogic::new(&strict_log));
    let home_log = log.clone();
    registry.register("View_Home", move || {
        RecordingLogic::new(&home_log).with_variable("greeting", json!("<hi>"))
    });

    Ok(ViewModelFactory::new(registry, views, config))
}

#[test]
fn test_hooks_run_in_order_and_share_variables() -> Result<()> {
    let log = CallLog::new();
    let factory = factory(&log, ConfigStore::new())?;
    let mut request = Request::default();

    let vm = factory.forge(&mut request, "article")?;
    assert_eq!(log.calls(), vec!["before"]);
    assert_eq!(vm.get("title"), Some(json!("Rust & Templates")));

    assert_eq!(vm.render()?, "<h1>RUST &amp; TEMPLATES</h1><p>Hello</p>");
    assert_eq!(log.calls(), vec!["before", "view", "after"]);
    assert_eq!(vm.state(), RenderState::Rendered);
    Ok(())
}

#[test]
fn test_named_render_method() -> Result<()> {
    let log = CallLog::new();
    let factory = factory(&log, ConfigStore::new())?;
    let mut request = Request::default();

    let vm = factory.forge_with(&mut request, "article", "summary", None)?;
    assert_eq!(vm.render()?, "<h1>RUST &amp; TEMPLATES</h1>(summary)");
    assert_eq!(log.count("view"), 0);
    assert_eq!(log.count("summary"), 1);
    Ok(())
}

#[test]
fn test_each_render_reruns_hooks() -> Result<()> {
    let log = CallLog::new();
    let factory = factory(&log, ConfigStore::new())?;
    let mut request = Request::default();

    let vm = factory.forge(&mut request, "home")?;
    vm.render()?;
    vm.render()?;

    assert_eq!(log.count("before"), 1);
    assert_eq!(log.count("view"), 2);
    assert_eq!(log.count("after"), 2);
    Ok(())
}

#[test]
fn test_auto_filter_from_config_and_override() -> Result<()> {
    let log = CallLog::new();
    let mut config = ConfigStore::new();
    config.set(AUTO_FILTER_KEY, false)?;
    let factory = factory(&log, config)?;
    let mut request = Request::default();

    let raw = factory.forge(&mut request, "home")?;
    assert_eq!(raw.render()?, "<hi>");

    let filtered = factory.forge_with(&mut request, "home", "view", Some(true))?;
    assert_eq!(filtered.render()?, "&lt;hi&gt;");
    Ok(())
}

#[test]
fn test_set_auto_filter_applies_to_later_sets() -> Result<()> {
    let log = CallLog::new();
    let factory = factory(&log, ConfigStore::new())?;
    let mut request = Request::default();

    let vm = factory.forge(&mut request, "home")?;
    vm.set_auto_filter(false);

    assert_eq!(vm.render()?, "<hi>");
    Ok(())
}

#[test]
fn test_render_propagates_hook_error_unmodified() -> Result<()> {
    let log = CallLog::new();
    let factory = factory(&log, ConfigStore::new())?;
    let mut request = Request::default();

    let vm = factory.forge(&mut request, "broken")?;
    let err = vm.render().unwrap_err();

    assert_eq!(err.to_string(), "database unavailable");
    assert_eq!(vm.state(), RenderState::RenderingMethod);
    Ok(())
}

#[test]
fn test_template_error_is_structured() -> Result<()> {
    let log = CallLog::new();
    let factory = factory(&log, ConfigStore::new())?;
    let mut request = Request::default();

    let err = factory.forge(&mut request, "strict")?.render().unwrap_err();

    match err.downcast_ref::<ViewModelError>() {
        Some(ViewModelError::TemplateRender {
            path,
            message,
        }) => {
            assert_eq!(path, "strict");
            assert!(message.contains("missing"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_display_swallows_errors_into_handler() -> Result<()> {
    let log = CallLog::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let handler: Rc<dyn ErrorHandler> =
        Rc::new(move |error: &anyhow::Error| sink.borrow_mut().push(error.to_string()));
    let factory = factory(&log, ConfigStore::new())?.with_error_handler(handler);

    let mut request = Request::default();
    factory.forge(&mut request, "broken")?;

    assert_eq!(request.response().render_body(), "");
    assert_eq!(*seen.borrow(), vec!["database unavailable".to_string()]);
    Ok(())
}
