//! End-to-end tests for the version bump over a cat-launcher style tree.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use cat_launcher_release::{ReleaseConfig, ReleaseVersion, VersionBumper};
use predicates::prelude::*;
use tempfile::TempDir;

const README: &str = "# cat-launcher\n\nDownload [cat-launcher_0.12.0_amd64.AppImage](https://github.com/x/releases/download/v0.12.0/cat-launcher_0.12.0_amd64.AppImage).\n";

const PACKAGE_JSON: &str = "{\n  \"name\": \"cat-launcher\",\n  \"private\": true,\n  \"version\": \"0.12.0\",\n  \"type\": \"module\"\n}\n";

const TAURI_CONF: &str = "{\n  \"productName\": \"cat-launcher\",\n  \"version\": \"0.12.0\",\n  \"identifier\": \"com.cat-launcher.app\"\n}\n";

const CARGO_TOML: &str = r#"[package]
name = "cat-launcher"
version = "0.12.0"
description = "A launcher for Cataclysm games"
edition = "2021"

# Tauri build script
[build-dependencies]
tauri-build = { version = "2", features = [] }
"#;

const CARGO_LOCK: &str = r#"# This file is automatically @generated by Cargo.
# It is not intended for manual editing.
version = 4

[[package]]
name = "anyhow"
version = "1.0.89"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "cat-launcher"
version = "0.12.0"
dependencies = [
 "anyhow",
]

[[package]]
name = "cat-macros"
version = "0.12.0"
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let tauri = root.join("cat-launcher/src-tauri");
        fs::create_dir_all(&tauri).unwrap();

        fs::write(root.join("README.md"), README).unwrap();
        fs::write(root.join("cat-launcher/package.json"), PACKAGE_JSON).unwrap();
        fs::write(tauri.join("tauri.conf.json"), TAURI_CONF).unwrap();
        fs::write(tauri.join("Cargo.toml"), CARGO_TOML).unwrap();
        fs::write(tauri.join("Cargo.lock"), CARGO_LOCK).unwrap();

        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn files(&self) -> Vec<PathBuf> {
        let root = self.root();
        vec![
            root.join("README.md"),
            root.join("cat-launcher/package.json"),
            root.join("cat-launcher/src-tauri/Cargo.lock"),
            root.join("cat-launcher/src-tauri/Cargo.toml"),
            root.join("cat-launcher/src-tauri/tauri.conf.json"),
        ]
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).unwrap()
    }

    fn snapshot(&self) -> Vec<String> {
        self.files()
            .iter()
            .map(|p| fs::read_to_string(p).unwrap())
            .collect()
    }

    fn bumper(&self) -> VersionBumper {
        let mut config = ReleaseConfig::default();
        config.paths.root = Some(self.root().to_path_buf());
        VersionBumper::from_config(&config)
    }
}

#[test]
fn test_bump_rewrites_all_five_targets() {
    let fx = Fixture::new();
    let version = ReleaseVersion::parse("0.13.0").unwrap();

    let mut updated = Vec::new();
    fx.bumper()
        .apply(&version, |t| updated.push(t.path.clone()))
        .unwrap();

    assert_eq!(updated, fx.files());
    assert_eq!(fx.read("README.md"), README.replace("cat-launcher_0.12.0", "cat-launcher_0.13.0"));
    assert_eq!(
        fx.read("cat-launcher/package.json"),
        PACKAGE_JSON.replace("0.12.0", "0.13.0")
    );
    assert_eq!(
        fx.read("cat-launcher/src-tauri/tauri.conf.json"),
        TAURI_CONF.replace("0.12.0", "0.13.0")
    );
    assert_eq!(
        fx.read("cat-launcher/src-tauri/Cargo.toml"),
        CARGO_TOML.replace("version = \"0.12.0\"", "version = \"0.13.0\"")
    );
    assert_eq!(
        fx.read("cat-launcher/src-tauri/Cargo.lock"),
        CARGO_LOCK.replace(
            "name = \"cat-launcher\"\nversion = \"0.12.0\"",
            "name = \"cat-launcher\"\nversion = \"0.13.0\""
        )
    );
}

#[test]
fn test_bump_is_idempotent() {
    let fx = Fixture::new();
    let version = ReleaseVersion::parse("1.0.0").unwrap();

    fx.bumper().apply(&version, |_| {}).unwrap();
    let first = fx.snapshot();
    fx.bumper().apply(&version, |_| {}).unwrap();

    assert_eq!(fx.snapshot(), first);
}

#[test]
fn test_lock_leaves_other_entries_alone() {
    let fx = Fixture::new();
    fx.bumper()
        .apply(&ReleaseVersion::parse("0.13.0").unwrap(), |_| {})
        .unwrap();

    let lock = fx.read("cat-launcher/src-tauri/Cargo.lock");
    assert!(lock.contains("name = \"cat-macros\"\nversion = \"0.12.0\""));
    assert!(lock.contains("name = \"anyhow\"\nversion = \"1.0.89\""));
}

#[test]
fn test_cli_bumps_and_reports_each_file() {
    let fx = Fixture::new();

    let assert = Command::cargo_bin("bump-version")
        .unwrap()
        .arg("0.14.1")
        .arg("--root")
        .arg(fx.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Version bumped to 0.14.1"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("Updated ").count(), 5);
    assert!(fx.read("cat-launcher/package.json").contains("\"version\": \"0.14.1\""));
}

#[test]
fn test_cli_rejects_invalid_version_without_writing() {
    let fx = Fixture::new();
    let before = fx.snapshot();

    for bad in ["0.13", "v0.13.0", "latest"] {
        Command::cargo_bin("bump-version")
            .unwrap()
            .arg(bad)
            .arg("--root")
            .arg(fx.root())
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "Version must be a valid semantic version",
            ));
    }

    assert_eq!(fx.snapshot(), before);
}

#[test]
fn test_cli_fails_on_missing_artifact() {
    let fx = Fixture::new();
    fs::remove_file(fx.root().join("cat-launcher/src-tauri/Cargo.toml")).unwrap();

    Command::cargo_bin("bump-version")
        .unwrap()
        .arg("0.13.0")
        .arg("--root")
        .arg(fx.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cargo.toml"));

    // Targets before the missing manifest were already rewritten.
    assert!(fx.read("README.md").contains("cat-launcher_0.13.0_amd64.AppImage"));
    assert!(fx
        .read("cat-launcher/src-tauri/tauri.conf.json")
        .contains("\"version\": \"0.12.0\""));
}
