//! Integration tests for the reqcache binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LOCAL_RECIPE: &str = r#"
name: Test
version: "0.1"
options:
  myopt: [true, false]
default_options:
  myopt: true
system_requirements: echo "Installed my stuff"
"#;

const GLOBAL_RECIPE: &str = r#"
name: Test
version: "0.1"
options:
  myopt: [true, false]
default_options:
  myopt: true
global_system_requirements: true
system_requirements: echo "Installed my stuff"
"#;

struct Workspace {
    home: TempDir,
    recipe: TempDir,
}

impl Workspace {
    fn new(recipe: &str) -> Self {
        let home = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("reqcache.yml"), recipe).unwrap();
        Self { home, recipe: dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("reqcache"));
        cmd.env("REQCACHE_HOME", self.home.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn recipe_path(&self) -> &Path {
        self.recipe.path()
    }

    fn install(&self, extra: &[&str]) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("install")
            .arg(self.recipe_path())
            .arg("user/testing")
            .args(extra);
        cmd
    }
}

const RUNNING: &str = "Running system requirements for Test/0.1@user/testing";

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("reqcache"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("system-requirements cache"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("reqcache"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn install_runs_system_requirements_once() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(LOCAL_RECIPE);

    ws.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING));

    ws.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("Package ID"))
        .stdout(predicate::str::contains(RUNNING).not());
    Ok(())
}

#[test]
fn local_recipe_runs_per_package() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(LOCAL_RECIPE);

    ws.install(&[]).assert().success();
    ws.install(&["-o", "myopt=False"])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING));
    ws.install(&["-o", "myopt=False"])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING).not());
    Ok(())
}

#[test]
fn global_recipe_runs_once_for_all_packages() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(GLOBAL_RECIPE);

    ws.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING));
    ws.install(&["-o", "myopt=False"])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING).not());
    Ok(())
}

#[test]
fn remove_packages_keeps_global_entry() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(GLOBAL_RECIPE);
    ws.install(&[]).assert().success();

    ws.cmd()
        .args(["remove", "Test/0.1@user/testing", "-p", "-f"])
        .assert()
        .success();

    ws.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING).not());
    Ok(())
}

#[test]
fn remove_everything_reruns_global_requirements() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(GLOBAL_RECIPE);
    ws.install(&[]).assert().success();

    ws.cmd()
        .args(["remove", "Test/*", "-f"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 entries"));

    ws.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING));
    Ok(())
}

#[test]
fn remove_single_package_reruns_only_it() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(LOCAL_RECIPE);
    ws.install(&[]).assert().success();
    ws.install(&["-o", "myopt=False"]).assert().success();

    let output = ws
        .cmd()
        .arg("info")
        .arg(ws.recipe_path())
        .args(["user/testing", "-o", "myopt=False", "--json"])
        .output()?;
    let info: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let id = info["package_id"].as_str().unwrap().to_string();

    ws.cmd()
        .args(["remove", "Test/0.1@user/testing", "-p", &id, "-f"])
        .assert()
        .success();

    ws.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING).not());
    ws.install(&["-o", "myopt=False"])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING));
    Ok(())
}

#[test]
fn remove_requires_force_without_terminal() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(LOCAL_RECIPE);
    ws.install(&[]).assert().success();

    ws.cmd()
        .args(["remove", "Test/*"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    ws.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains(RUNNING).not());
    Ok(())
}

#[test]
fn failing_requirements_exit_non_zero() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new("name: Broken\nversion: \"1.0\"\nsystem_requirements: exit 4\n");

    ws.install(&[])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("System requirements for"));

    ws.cmd()
        .args(["cache", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
    Ok(())
}

#[test]
fn invalid_option_value_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(LOCAL_RECIPE);

    ws.install(&["-o", "myopt=Maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Maybe"));
    Ok(())
}

#[test]
fn info_reports_reserved_id() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new("name: Plain\nversion: \"1.0\"\nsystem_requirements: echo ok\n");

    ws.cmd()
        .arg("info")
        .arg(ws.recipe_path())
        .arg("user/testing")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "5ab84d6acfe1f23c4fae0ab88f26e3a396351ac9",
        ))
        .stdout(predicate::str::contains("not installed"));
    Ok(())
}

#[test]
fn cache_list_shows_installed_entry() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(GLOBAL_RECIPE);
    ws.install(&[]).assert().success();

    ws.cmd()
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test/0.1@user/testing  global"));
    Ok(())
}

#[test]
fn cache_path_honors_home() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(LOCAL_RECIPE);
    let expected = ws.home.path().join("data");

    ws.cmd()
        .args(["cache", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
    Ok(())
}

#[test]
fn quiet_hides_status_messages() -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::new(LOCAL_RECIPE);

    ws.install(&["-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}
