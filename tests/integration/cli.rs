//! Tests for the `vmrender` command line.

use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_render_prints_escaped_output() {
    let project = TestProject::new().unwrap();
    project.add_template("user/profile", "Hi {{ name }}, {{ age }}").unwrap();

    project
        .command()
        .args(["render", "user/profile", "--var", "name=<Ann>", "--var", "age=42"])
        .assert()
        .success()
        .stdout("Hi &lt;Ann&gt;, 42\n");
}

#[test]
fn test_render_without_filter() {
    let project = TestProject::new().unwrap();
    project.add_template("home", "{{ html }}").unwrap();

    project
        .command()
        .args(["render", "home", "--var", "html=<b>x</b>", "--no-filter"])
        .assert()
        .success()
        .stdout("<b>x</b>\n");
}

#[test]
fn test_render_with_data_file_and_module() {
    let project = TestProject::new().unwrap();
    project.add_template("user/card", "{% for t in tags %}#{{ t }} {% endfor %}").unwrap();
    project.write_file("card.json", r#"{"tags": ["rust", "web"]}"#).unwrap();

    project
        .command()
        .args(["--module", "blog", "render", "user/card", "--data", "card.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#rust #web"));
}

#[test]
fn test_config_file_disables_filtering() {
    let project = TestProject::new().unwrap();
    project.write_file("site/home.tpl", "{{ html }}").unwrap();
    project
        .write_config(
            r#"
[views]
path = "site"
extension = "tpl"

[security]
auto_filter_view_data = false
"#,
        )
        .unwrap();

    project
        .command()
        .args(["render", "home", "--var", "html=<i>raw</i>"])
        .assert()
        .success()
        .stdout("<i>raw</i>\n");
}

#[test]
fn test_config_from_environment_variable() {
    let project = TestProject::new().unwrap();
    project.write_file("elsewhere/views/page.html", "{{ x }}").unwrap();
    let config = project
        .write_file("elsewhere/app.toml", "[security]\nauto_encode_view_data = false\n")
        .unwrap();

    project
        .command()
        .env("VIEWMODEL_CONFIG", &config)
        .args(["render", "page", "--var", "x=<u>"])
        .assert()
        .success()
        .stdout("<u>\n");
}

#[test]
fn test_templates_lists_views() {
    let project = TestProject::new().unwrap();
    project.add_template("home", "").unwrap();
    project.add_template("user/profile", "").unwrap();

    project
        .command()
        .arg("templates")
        .assert()
        .success()
        .stdout("home\nuser/profile\n");
}

#[test]
fn test_missing_template_reports_error() {
    let project = TestProject::new().unwrap();
    project.add_template("home", "").unwrap();

    project
        .command()
        .args(["render", "admin/dashboard"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "The requested view could not be found: admin/dashboard",
        ))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_unknown_method_reports_error() {
    let project = TestProject::new().unwrap();
    project.add_template("home", "").unwrap();

    project
        .command()
        .args(["render", "home", "--method", "print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no render method named \"print\""));
}

#[test]
fn test_invalid_config_reports_error() {
    let project = TestProject::new().unwrap();
    project.write_config("[views\npath = ").unwrap();

    project
        .command()
        .arg("templates")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_var_is_rejected() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["render", "home", "--var", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_missing_views_directory_reports_error() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["--views", "view", "templates"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Views directory does not exist"));
}
