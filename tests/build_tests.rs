//! Integration tests for `rscharm build`
//!
//! A scripted cargo is put first on PATH so the whole pipeline runs
//! without compiling anything.

#![cfg(unix)]

mod common;

use std::os::unix::fs::PermissionsExt;

use common::{SCENARIO_PROBE_OUTPUT, TestEnv, rscharm_cmd};
use predicates::prelude::*;

#[test]
fn test_build_writes_charm_into_repository() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);
    let charm = env.repo().join("trusty").join("mycharm");

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .assert()
        .success()
        .stdout(predicate::str::contains(charm.display().to_string()));

    for hook in ["install", "start", "config-changed"] {
        let stub = charm.join("hooks").join(hook);
        let script = std::fs::read_to_string(&stub).expect("hook stub");
        assert!(script.contains(&format!("\"$CHARM_DIR/bin/runhook\" \"{hook}\"")));
        let mode = std::fs::metadata(&stub).expect("stat").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
    assert!(charm.join("bin/runhook").is_file());

    let metadata = std::fs::read_to_string(charm.join("metadata.yaml")).expect("metadata");
    assert!(metadata.starts_with("# This file is automatically generated"));
    assert!(metadata.contains("name: mycharm"));
    assert!(metadata.contains("provides:"));
    assert!(metadata.contains("interface: mysql"));

    let config = std::fs::read_to_string(charm.join("config.yaml")).expect("config");
    assert!(config.contains("debug:"));
    assert!(config.contains("type: boolean"));

    assert_eq!(
        env.builds(),
        vec![
            "runhook x86_64-unknown-linux-musl".to_string(),
            "charminfo host".to_string(),
        ]
    );
}

#[test]
fn test_build_honours_series_and_target() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .args(["--series", "xenial", "--target", "aarch64-unknown-linux-musl"])
        .assert()
        .success();

    assert!(env.repo().join("xenial/mycharm/bin/runhook").is_file());
    assert_eq!(env.builds()[0], "runhook aarch64-unknown-linux-musl");
}

#[test]
fn test_rebuild_keeps_hand_written_hooks() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);
    let charm = env.repo().join("trusty").join("mycharm");
    common::write_executable(&charm.join("hooks/install"), "#!/bin/sh\necho custom\n");

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .assert()
        .success();

    let install = std::fs::read_to_string(charm.join("hooks/install")).expect("install");
    assert_eq!(install, "#!/bin/sh\necho custom\n");
    assert!(charm.join("hooks/start").is_file());
}

#[test]
fn test_build_validated_charm_passes_validate() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);
    let dest = env.path().join("out").join("mycharm");

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .arg("--dest")
        .arg(&dest)
        .assert()
        .success();

    rscharm_cmd()
        .arg("validate")
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hooks (3)"));
}

#[test]
fn test_source_build_ships_sources() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);
    let charm = env.repo().join("trusty").join("mycharm");

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .arg("--source")
        .assert()
        .success();

    assert!(!charm.join("bin/runhook").exists());
    assert!(charm.join("src/runhook/Cargo.toml").is_file());
    assert!(charm.join("src/runhook/charm/src/lib.rs").is_file());
    assert!(charm.join("src/runhook/vendor/charm-hook-0.2.0").is_dir());
    assert!(!charm.join("src/runhook/.git").exists());

    let cargo_config =
        std::fs::read_to_string(charm.join("src/runhook/.cargo/config.toml")).expect("config");
    assert!(cargo_config.contains("directory = \"vendor\""));

    let compile = std::fs::read_to_string(charm.join("compile")).expect("compile script");
    assert!(compile.contains("--offline"));

    let install = std::fs::read_to_string(charm.join("hooks/install")).expect("install hook");
    assert!(install.contains("$CHARM_DIR/compile"));

    assert_eq!(
        env.builds(),
        vec!["runhook host".to_string(), "charminfo host".to_string()]
    );
}

#[test]
fn test_source_build_without_vendor_tool() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);
    env.disable_vendor();

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .arg("--source")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot get dependencies"))
        .stderr(predicate::str::contains("cargo-vendor executable not found"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_unknown_relation_role_fails_before_descriptors() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(
        r#"{"hooks": ["start"], "relations": {"db": {"name": "db", "role": "client", "interface": "mysql"}}}"#,
    );
    let charm = env.repo().join("trusty").join("mycharm");

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot get charm info"));

    assert!(!charm.join("metadata.yaml").exists());
    assert!(!charm.join("hooks").exists());
}

#[test]
fn test_build_missing_package_dir() {
    let env = TestEnv::new();

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(env.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Cargo package found at"));
}

#[test]
fn test_build_requires_metadata_yaml() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    std::fs::remove_file(package.join("metadata.yaml")).expect("remove");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No metadata.yaml found"));
}

#[test]
fn test_build_without_repository() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");

    rscharm_cmd()
        .env_remove("JUJU_REPOSITORY")
        .arg("build")
        .arg(&package)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No charm repository given"))
        .stderr(predicate::str::contains("JUJU_REPOSITORY"));
}

#[test]
fn test_build_rejects_invalid_target() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .args(["--target", "musl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("musl"));

    assert!(env.builds().is_empty());
}

#[test]
fn test_build_rejects_invalid_charm_name() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    env.install_fake_cargo(SCENARIO_PROBE_OUTPUT);

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .arg("--dest")
        .arg(env.path().join("My_Charm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid charm name"));
}

#[test]
fn test_build_reports_cargo_failure() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    let bin = env.path().join("fakebin");
    common::write_executable(
        &bin.join("cargo"),
        "#!/bin/sh\necho 'error: could not compile `mycharm`' >&2\nexit 101\n",
    );

    env.rscharm_with_fake_cargo()
        .arg("build")
        .arg(&package)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not compile"));
}

#[test]
fn test_build_without_cargo() {
    let env = TestEnv::new();
    let package = env.write_package("mycharm");
    let empty = env.path().join("empty-path");
    std::fs::create_dir_all(&empty).expect("dir");

    rscharm_cmd()
        .env("PATH", &empty)
        .env("JUJU_REPOSITORY", env.repo())
        .arg("build")
        .arg(&package)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cargo executable not found"))
        .stderr(predicate::str::contains("rustup"));
}
