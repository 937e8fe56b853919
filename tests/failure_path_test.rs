use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn scaffold_project(root: &Path) {
    let webapp = root.join("src/main/webapp");
    fs::create_dir_all(webapp.join("WEB-INF/views")).expect("mkdir views");
    fs::create_dir_all(webapp.join("WEB-INF/tags")).expect("mkdir tags");
    fs::create_dir_all(webapp.join("WEB-INF/spring")).expect("mkdir spring");
    fs::write(root.join("pom.xml"), "<project/>\n").expect("write pom");
    fs::write(webapp.join("WEB-INF/spring/webmvc-config.xml"), "<beans/>\n").expect("write mvc");
}

fn tbootstrap(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tbootstrap").expect("bin");
    cmd.env("TBOOTSTRAP_HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("TBOOTSTRAP_CONFIG_PATH", home.join("absent.toml"))
        .env_remove("TBOOTSTRAP_PROJECT")
        .env_remove("TBOOTSTRAP_WEBAPP_DIR")
        .env_remove("TBOOTSTRAP_BUNDLE_DIR")
        .env_remove("TBOOTSTRAP_AUDIT_LOG")
        .env_remove("TBOOTSTRAP_LOCK");
    cmd
}

#[test]
fn install_refused_when_project_not_applicable() {
    let tmp = tempdir().expect("tempdir");
    let project = tmp.path().join("app");
    scaffold_project(&project);
    fs::remove_file(project.join("src/main/webapp/WEB-INF/spring/webmvc-config.xml"))
        .expect("rm mvc");

    tbootstrap(tmp.path())
        .arg("--project")
        .arg(&project)
        .arg("install")
        .assert()
        .code(2)
        .stdout(contains("bootstrap install not available"));

    assert!(!project.join("src/main/webapp/styles").exists());
}

#[test]
fn skip_checks_installs_anyway() {
    let tmp = tempdir().expect("tempdir");
    let project = tmp.path().join("bare");
    fs::create_dir_all(&project).expect("mkdir");

    tbootstrap(tmp.path())
        .arg("--project")
        .arg(&project)
        .args(["install", "--skip-checks"])
        .assert()
        .success()
        .stdout(contains("availability=skipped"))
        .stdout(contains("menu.jspx=missing_file"));

    assert!(project.join("src/main/webapp/styles/bootstrap.min.css").is_file());
}

#[test]
fn malformed_menu_fails_after_assets_are_copied() {
    let tmp = tempdir().expect("tempdir");
    let project = tmp.path().join("app");
    scaffold_project(&project);
    fs::write(
        project.join("src/main/webapp/WEB-INF/views/menu.jspx"),
        "<div id=\"menu\"><ul></div>\n",
    )
    .expect("write menu");

    tbootstrap(tmp.path())
        .arg("--project")
        .arg(&project)
        .arg("install")
        .assert()
        .code(1)
        .stderr(contains("install failed"))
        .stderr(contains("malformed document"));

    assert!(project.join("src/main/webapp/images/favicon.ico").is_file());
    assert!(project.join("src/main/webapp/WEB-INF/tags/util/theme.tagx").is_file());
}

#[test]
fn invalid_config_is_reported() {
    let tmp = tempdir().expect("tempdir");
    let project = tmp.path().join("app");
    scaffold_project(&project);
    let config = tmp.path().join("tbootstrap.toml");
    fs::write(&config, "webapp_dir = \"../outside\"\n").expect("write config");

    tbootstrap(tmp.path())
        .env("TBOOTSTRAP_CONFIG_PATH", &config)
        .arg("--project")
        .arg(&project)
        .arg("status")
        .assert()
        .code(1)
        .stderr(contains("invalid webapp_dir"));
}

#[test]
fn unknown_config_keys_are_rejected() {
    let tmp = tempdir().expect("tempdir");
    let project = tmp.path().join("app");
    scaffold_project(&project);
    let config = tmp.path().join("tbootstrap.toml");
    fs::write(&config, "webapp = \"web\"\n").expect("write config");

    tbootstrap(tmp.path())
        .env("TBOOTSTRAP_CONFIG_PATH", &config)
        .arg("--project")
        .arg(&project)
        .arg("status")
        .assert()
        .code(1)
        .stderr(contains("failed to parse config"));
}
