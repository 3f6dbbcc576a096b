//! Common test utilities for rscharm integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Probe output for a charm with three hooks, a `db` provider relation and
/// a boolean `debug` option
pub const SCENARIO_PROBE_OUTPUT: &str = r#"{
    "hooks": ["install", "start", "config-changed"],
    "relations": {
        "db": {"name": "db", "role": "provider", "interface": "mysql"}
    },
    "config": {
        "debug": {"type": "boolean", "description": "Enable debug logging", "default": false}
    }
}"#;

/// Stand-in for cargo covering the subcommands rscharm runs
///
/// `build` copies the `probe` script next to it into the artifact path and
/// logs `<bin> <target or host>` to `builds.log`.
const FAKE_CARGO: &str = r#"#!/bin/sh
here=$(dirname "$0")
[ "$1" = "--color" ] && shift 2
sub="$1"
shift
case "$sub" in
metadata)
    while [ $# -gt 0 ]; do
        [ "$1" = "--manifest-path" ] && manifest="$2"
        shift
    done
    dir=$(dirname "$manifest")
    name=$(basename "$dir")
    printf '{"packages":[{"name":"%s","manifest_path":"%s","targets":[{"name":"%s","kind":["lib"]}],"dependencies":[{"name":"charm-hook","source":"registry+https://github.com/rust-lang/crates.io-index","req":"^0.2","kind":null}]}],"workspace_root":"%s"}\n' "$name" "$manifest" "$name" "$dir"
    ;;
build)
    while [ $# -gt 0 ]; do
        case "$1" in
            --target-dir) target_dir="$2" ;;
            --bin) bin="$2" ;;
        esac
        shift
    done
    out="$target_dir/${CARGO_BUILD_TARGET:+$CARGO_BUILD_TARGET/}release"
    mkdir -p "$out"
    cp "$here/probe" "$out/$bin"
    chmod +x "$out/$bin"
    echo "$bin ${CARGO_BUILD_TARGET:-host}" >> "$here/builds.log"
    ;;
vendor)
    if [ -e "$here/no-vendor" ]; then
        echo "error: no such command: \`vendor\`" >&2
        exit 101
    fi
    for last; do :; done
    mkdir -p "$last/charm-hook-0.2.0"
    printf '[source.crates-io]\nreplace-with = "vendored-sources"\n\n[source.vendored-sources]\ndirectory = "%s"\n' "$last"
    ;;
*)
    echo "error: no such command: \`$sub\`" >&2
    exit 101
    ;;
esac
"#;

/// A scratch area holding charm packages, a charm repository and a fake cargo
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// The charm repository used as JUJU_REPOSITORY
    pub fn repo(&self) -> PathBuf {
        self.path().join("repo")
    }

    /// Write a charm package with a base metadata.yaml
    pub fn write_package(&self, name: &str) -> PathBuf {
        let dir = self.path().join("packages").join(name);
        std::fs::create_dir_all(dir.join("src")).expect("Failed to create package");
        std::fs::write(
            dir.join("Cargo.toml"),
            format!(
                "[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n\n[dependencies]\ncharm-hook = \"0.2\"\n"
            ),
        )
        .expect("Failed to write Cargo.toml");
        std::fs::write(
            dir.join("src/lib.rs"),
            "pub fn register_hooks(_r: &mut charm_hook::Registry) {}\n",
        )
        .expect("Failed to write lib.rs");
        std::fs::write(
            dir.join("metadata.yaml"),
            format!("name: {name}\nsummary: Test charm\ndescription: A charm used in tests.\n"),
        )
        .expect("Failed to write metadata.yaml");
        dir
    }

    /// Install the fake cargo, with artifacts that print `probe_output`
    pub fn install_fake_cargo(&self, probe_output: &str) -> PathBuf {
        let bin = self.path().join("fakebin");
        write_executable(&bin.join("cargo"), FAKE_CARGO);
        write_executable(
            &bin.join("probe"),
            &format!("#!/bin/sh\ncat <<'EOF'\n{probe_output}\nEOF\n"),
        );
        bin
    }

    /// Make the fake cargo behave as if `cargo vendor` is unavailable
    pub fn disable_vendor(&self) {
        std::fs::write(self.path().join("fakebin").join("no-vendor"), "")
            .expect("Failed to write marker");
    }

    /// Lines of `<bin> <target>` for every fake build so far
    pub fn builds(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join("fakebin").join("builds.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// An rscharm command with the fake cargo first on PATH
    pub fn rscharm_with_fake_cargo(&self) -> Command {
        let bin = self.path().join("fakebin");
        let path = std::env::var("PATH").unwrap_or_default();
        let mut cmd = rscharm_cmd();
        cmd.env("PATH", format!("{}:{path}", bin.display()))
            .env("JUJU_REPOSITORY", self.repo())
            .env_remove("CARGO_BUILD_TARGET")
            .env_remove("RSCHARM_TARGET")
            .env_remove("RSCHARM_SERIES");
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn rscharm_cmd() -> Command {
    Command::cargo_bin("rscharm").expect("rscharm binary")
}

pub fn write_executable(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod");
    }
}

/// Write a charm directory as rscharm would leave it
pub fn write_charm(dir: &Path, name: &str) {
    std::fs::create_dir_all(dir).expect("Failed to create charm dir");
    std::fs::write(
        dir.join("metadata.yaml"),
        format!("name: {name}\nsummary: Test charm\ndescription: d\nprovides:\n  db:\n    interface: mysql\n"),
    )
    .expect("Failed to write metadata.yaml");
    std::fs::write(
        dir.join("config.yaml"),
        "options:\n  debug:\n    type: boolean\n    description: Enable debug logging\n    default: false\n",
    )
    .expect("Failed to write config.yaml");
    write_executable(&dir.join("bin/runhook"), "#!/bin/sh\n");
    for hook in ["install", "start"] {
        write_executable(
            &dir.join("hooks").join(hook),
            &format!("#!/bin/sh\nexec \"$CHARM_DIR/bin/runhook\" \"{hook}\"\n"),
        );
    }
}
