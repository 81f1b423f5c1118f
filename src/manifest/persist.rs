//! Merge-on-write persistence for the manifest file.
//!
//! Existing keys survive unless the new answers name them. The merged map is
//! written with sorted keys to a temp file beside the target and renamed over
//! it, so a failed write never clobbers a valid manifest.
use super::Answers;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub fn save_manifest(answers: &Answers, path: &Path) -> Result<()> {
    let mut manifest = load_existing(path)?;
    manifest.extend(answers.iter().map(|(key, value)| (key.clone(), value.clone())));

    println!("Saving manifest to {}", path.display());
    write_manifest(&manifest, path)?;
    tracing::info!(
        path = %path.display(),
        keys = manifest.len(),
        updated = answers.len(),
        "manifest saved"
    );
    Ok(())
}

fn load_existing(path: &Path) -> Result<Answers> {
    if !path.is_file() {
        return Ok(Answers::new());
    }
    let bytes = fs::read(path).with_context(|| format!("read manifest {}", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse manifest JSON {}", path.display()))?;
    let Value::Object(map) = value else {
        bail!("manifest {} is not a JSON object", path.display());
    };
    Ok(map.into_iter().collect())
}

fn write_manifest(manifest: &Answers, path: &Path) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(manifest).context("serialize manifest")?;
    bytes.push(b'\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(&bytes)
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", tmp.path().display()))?;
    set_permissions(&tmp, path)?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("write manifest {}", path.display()))?;
    Ok(())
}

/// Keep the mode of an existing manifest; new files get 0644 instead of the
/// temp file's 0600.
fn set_permissions(tmp: &NamedTempFile, path: &Path) -> Result<()> {
    let permissions = match fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(_) => default_permissions(tmp)?,
    };
    fs::set_permissions(tmp.path(), permissions)
        .with_context(|| format!("set permissions on {}", tmp.path().display()))
}

#[cfg(unix)]
fn default_permissions(_tmp: &NamedTempFile) -> Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(tmp: &NamedTempFile) -> Result<fs::Permissions> {
    let meta = tmp
        .as_file()
        .metadata()
        .with_context(|| format!("stat {}", tmp.path().display()))?;
    Ok(meta.permissions())
}
