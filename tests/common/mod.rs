//! Shared test infrastructure for integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const CAMERA: &str = "com.canonical.certification::has_camera";
pub const HDMI: &str = "com.canonical.certification::has_hdmi";

/// Units for one provider: two known manifest entries, one unknown entry and
/// one ordinary job.
pub const CHECKBOX_UNITS: &str = "\
unit: manifest entry
id: has_camera
_name: Camera
value-type: bool

id: camera/detect
_summary: Detect the camera
plugin: shell
requires: manifest.has_camera == 'True'

unit: manifest entry
id: has_flux_capacitor
_name: Flux capacitor
value-type: bool

unit: manifest entry
id: has_hdmi
_name: HDMI ports
_prompt: How many HDMI ports does this machine have?
value-type: natural
";

/// A provider tree on disk plus a place for the manifest.
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn checkbox() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let fixture = Self { root };
        let location = fixture.root.path().join("checkbox");
        write_file(
            &fixture.providers_dir().join("checkbox.provider"),
            &format!(
                "[PlainBox Provider]\nname = com.canonical.certification:checkbox\nlocation = {}\n",
                location.display()
            ),
        );
        write_file(&location.join("units/manifest.pxu"), CHECKBOX_UNITS);
        fixture
    }

    pub fn providers_dir(&self) -> PathBuf {
        self.root.path().join("providers")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.path().join("manifest.json")
    }

    /// Run the generator with `stdin` piped in as the operator's replies.
    pub fn run(&self, stdin: &str) -> Output {
        run_generator(&self.providers_dir(), &self.manifest_path(), stdin)
    }
}

pub fn run_generator(providers: &Path, manifest: &Path, stdin: &str) -> Output {
    let bin = env!("CARGO_BIN_EXE_hw-manifest");
    let mut child = Command::new(bin)
        .arg("--no-tui")
        .arg("--provider-path")
        .arg(providers)
        .arg("--output-file")
        .arg(manifest)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn hw-manifest");
    child
        .stdin
        .take()
        .expect("child stdin")
        .write_all(stdin.as_bytes())
        .expect("write replies");
    child.wait_with_output().expect("wait for hw-manifest")
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents.as_bytes()).expect("write file");
}
