//! Integration tests for the codo binary.
//!
//! These tests exercise the full CLI against a temporary config tree. The
//! engine is replaced by harmless host programs (`echo`, `sh`) through the
//! `engine` key of the global config, so nothing here needs docker.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

// =============================================================================
// Test Fixtures
// =============================================================================

/// A config root, storage root, and scratch directory in one temp dir.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new(global: &str) -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("config/config.yaml").write_str(global).unwrap();
        dir.child("config/images").create_dir_all().unwrap();
        dir.child("storage").create_dir_all().unwrap();
        dir.child("tmp").create_dir_all().unwrap();
        dir.child("work").create_dir_all().unwrap();
        Self { dir }
    }

    fn image(&self, name: &str, config: &str) -> &Self {
        self.dir
            .child(format!("config/images/{}/config.yaml", name))
            .write_str(config)
            .unwrap();
        self
    }

    fn codo(&self) -> Command {
        let mut cmd = Command::cargo_bin("codo").unwrap();
        cmd.env("CODO_CONFIG_DIR", self.dir.path().join("config"))
            .env("CODO_STORAGE_DIR", self.dir.path().join("storage"))
            .env("TMPDIR", self.dir.path().join("tmp"))
            .env_remove("DISPLAY")
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path().join("work"));
        cmd
    }
}

const ECHO_ENGINE: &str = "default-image: dev\nengine: [echo]\n";

// =============================================================================
// Basics
// =============================================================================

#[test]
fn version_flag_works() {
    Command::cargo_bin("codo")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("codo"));
}

#[test]
fn help_flag_works() {
    Command::cargo_bin("codo")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--list-images"));
}

#[test]
fn completion_script_generated() {
    Command::cargo_bin("codo")
        .unwrap()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_codo"));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn missing_global_config_fails() {
    let sandbox = Sandbox::new("");
    std::fs::remove_file(sandbox.dir.path().join("config/config.yaml")).unwrap();

    sandbox
        .codo()
        .arg("true")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.yaml"));
}

#[test]
fn global_config_without_default_image_fails() {
    let sandbox = Sandbox::new("engine: [echo]\n");

    sandbox
        .codo()
        .arg("true")
        .assert()
        .failure()
        .stderr(predicate::str::contains("default-image"));
}

#[test]
fn list_images_sorted() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox.image("zulu", "").image("alpha", "base-image: alpine\n");
    sandbox.dir.child("config/images/stray.txt").write_str("").unwrap();

    sandbox
        .codo()
        .arg("--list-images")
        .assert()
        .success()
        .stdout("alpha\nzulu\n");
}

#[test]
fn show_config_prints_resolved_json() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox.image("dev", "base-image: fedora:40\nattach-pwd: false\n");

    let output = sandbox
        .codo()
        .arg("--show-config")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["image"], "dev");
    assert_eq!(json["config"]["base-image"], "fedora:40");
    assert_eq!(json["config"]["bind-working-dir"], false);
    assert_eq!(json["config"]["pass-gui"], true);
    assert_eq!(json["engine"], serde_json::json!(["echo"]));
}

#[test]
fn show_config_rejects_wrong_type() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox.image("dev", "pass-gui: sometimes\n");

    sandbox
        .codo()
        .arg("--show-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass-gui"));
}

// =============================================================================
// Running
// =============================================================================

#[test]
fn run_passes_command_through() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    let work = sandbox.dir.path().join("work");

    sandbox
        .codo()
        .args(["--cwd", work.to_str().unwrap(), "ls", "-la", "--build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("image inspect").not())
        .stdout(predicate::str::contains(format!(
            "run -ti --rm -v {}:/codo -w /codo codo-",
            work.display()
        )))
        .stdout(predicate::str::ends_with("-dev ls -la --build\n"));
}

#[test]
fn run_selects_image_flag() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox.image("rust", "bind-working-dir: false\n");

    sandbox
        .codo()
        .args(["-i", "rust", "cargo", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run -ti --rm codo-"))
        .stdout(predicate::str::ends_with("-rust cargo build\n"));
}

#[test]
fn invalid_image_name_rejected() {
    let sandbox = Sandbox::new(ECHO_ENGINE);

    sandbox
        .codo()
        .args(["-i", "../etc", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid image name"));
}

#[test]
fn container_exit_status_propagated() {
    let sandbox = Sandbox::new(
        "default-image: dev\nauto-build: false\nengine: [sh, -c, 'exit 7', sh]\n",
    );

    sandbox.codo().arg("anything").assert().code(7);
}

#[test]
fn engine_not_found_fails() {
    let sandbox = Sandbox::new("default-image: dev\nengine: [codo-no-such-engine]\n");

    sandbox
        .codo()
        .arg("true")
        .assert()
        .failure()
        .stderr(predicate::str::contains("codo-no-such-engine"));
}

// =============================================================================
// Building
// =============================================================================

#[test]
fn build_all_writes_dockerfiles_and_state() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox
        .image("alpha", "base-image: alpine:3.20\n")
        .image("beta", "base-image: debian\n");

    sandbox
        .codo()
        .arg("--build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built alpha as codo-"))
        .stdout(predicate::str::contains("Built beta as codo-"));

    let state = sandbox.dir.child("storage/alpha/state.yaml");
    state.assert(predicate::str::contains("working-dir:"));

    let contexts = std::fs::read_dir(sandbox.dir.path().join("tmp/codo"))
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let dockerfile = std::fs::read_to_string(contexts.join("alpha/Dockerfile")).unwrap();
    assert_eq!(dockerfile, "FROM alpine:3.20\n");
}

#[test]
fn build_all_reports_failures_and_continues() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox
        .image("alpha", "base-image: alpine\n")
        .image("broken", "")
        .image("zulu", "base-image: fedora\n");

    sandbox
        .codo()
        .arg("--build")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Built alpha"))
        .stdout(predicate::str::contains("Built zulu"))
        .stderr(predicate::str::contains("broken"));
}

#[test]
fn build_one_image_then_run() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox
        .image("alpha", "base-image: alpine\n")
        .image("broken", "");

    sandbox
        .codo()
        .args(["-b", "-i", "alpha", "make"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built alpha as codo-"))
        .stdout(predicate::str::ends_with("-alpha make\n"));
}

#[test]
fn build_rejects_multiline_base_image() {
    let sandbox = Sandbox::new(ECHO_ENGINE);
    sandbox.image("dev", "base-image: \"alpine\\nRUN touch /etc/owned\"\n");

    sandbox
        .codo()
        .args(["-b", "-i", "dev"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("build -t").not())
        .stderr(predicate::str::contains("base-image"));

    assert!(!sandbox.dir.path().join("tmp/codo").exists());
}
