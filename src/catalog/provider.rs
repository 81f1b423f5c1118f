//! Provider discovery and catalog tree construction.
//!
//! A provider is registered by an INI-style `*.provider` file:
//!
//! ```text
//! [PlainBox Provider]
//! name = com.canonical.certification:checkbox
//! location = /usr/lib/plainbox-provider-checkbox
//! ```
//!
//! `namespace` defaults to the part of `name` before the first `:`,
//! `location` to the directory holding the `.provider` file and `units_dir`
//! to `<location>/units`.
use super::units::{parse_units, UnitRecord};
use super::{Catalog, JobNode, UnitNode, ValueType};
use anyhow::{anyhow, bail, Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

const PROVIDER_SECTION: &str = "PlainBox Provider";
const PROVIDERS_DIR_NAME: &str = "plainbox-providers-1";
const SYSTEM_PROVIDER_DIRS: [&str; 2] = [
    "/usr/local/share/plainbox-providers-1",
    "/usr/share/plainbox-providers-1",
];

/// Per-user data dir first, then the system locations.
pub fn default_search_path() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(data_dir) = dirs::data_dir() {
        dirs.push(data_dir.join(PROVIDERS_DIR_NAME));
    }
    dirs.extend(SYSTEM_PROVIDER_DIRS.iter().map(PathBuf::from));
    dirs
}

/// Catalog assembled from the providers found on a search path.
#[derive(Clone, Debug)]
pub struct ProviderCatalog {
    search_path: Vec<PathBuf>,
}

impl ProviderCatalog {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }

    /// Parse a colon-separated directory list (the `PROVIDERPATH` format).
    pub fn from_path_list(list: &str) -> Self {
        let search_path = std::env::split_paths(list)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect();
        Self::new(search_path)
    }

    fn provider_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir in &self.search_path {
            if !dir.is_dir() {
                tracing::debug!(dir = %dir.display(), "provider directory missing, skipped");
                continue;
            }
            let mut found = Vec::new();
            for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
                let path = entry
                    .with_context(|| format!("read {}", dir.display()))?
                    .path();
                if path.is_file() && path.extension() == Some(OsStr::new("provider")) {
                    found.push(path);
                }
            }
            found.sort();
            files.extend(found);
        }
        Ok(files)
    }
}

impl Catalog for ProviderCatalog {
    fn object_tree(&self) -> Result<JobNode> {
        let files = self.provider_files()?;
        if files.is_empty() {
            let searched = self
                .search_path
                .iter()
                .map(|dir| dir.display().to_string())
                .collect::<Vec<_>>()
                .join(":");
            bail!("no providers found (searched: {searched})");
        }

        let mut providers = Vec::new();
        for file in &files {
            let def = load_provider_file(file)?;
            let children = load_units(&def)?;
            tracing::info!(
                provider = %def.name,
                units = children.len(),
                "loaded provider"
            );
            providers.push(JobNode::Provider {
                name: def.name,
                children,
            });
        }
        providers.sort_by(|a, b| a.name().cmp(b.name()));

        Ok(JobNode::Root {
            name: "service".to_string(),
            children: providers,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ProviderDef {
    name: String,
    namespace: String,
    units_dir: PathBuf,
}

fn load_provider_file(path: &Path) -> Result<ProviderDef> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read provider {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_provider(&text, base).with_context(|| format!("parse provider {}", path.display()))
}

fn parse_provider(text: &str, base: &Path) -> Result<ProviderDef> {
    let mut section: Option<String> = None;
    let mut seen_section = false;
    let mut name = None;
    let mut namespace = None;
    let mut location = None;
    let mut units_dir = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            seen_section |= header.trim() == PROVIDER_SECTION;
            section = Some(header.trim().to_string());
            continue;
        }
        if section.as_deref() != Some(PROVIDER_SECTION) {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| anyhow!("line {}: expected `key = value`", idx + 1))?;
        let value = value.trim().to_string();
        match key.trim() {
            "name" => name = Some(value),
            "namespace" => namespace = Some(value),
            "location" => location = Some(PathBuf::from(value)),
            "units_dir" => units_dir = Some(PathBuf::from(value)),
            other => tracing::trace!(key = other, "ignoring provider key"),
        }
    }

    if !seen_section {
        bail!("missing [{PROVIDER_SECTION}] section");
    }
    let name = name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow!("provider has no name"))?;
    let namespace = namespace
        .filter(|namespace| !namespace.is_empty())
        .unwrap_or_else(|| name.split(':').next().unwrap_or(&name).to_string());
    let location = match location {
        Some(location) if location.is_absolute() => location,
        Some(location) => base.join(location),
        None => base.to_path_buf(),
    };
    let units_dir = match units_dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => location.join(dir),
        None => location.join("units"),
    };

    Ok(ProviderDef {
        name,
        namespace,
        units_dir,
    })
}

fn load_units(def: &ProviderDef) -> Result<Vec<JobNode>> {
    if !def.units_dir.is_dir() {
        tracing::warn!(
            provider = %def.name,
            dir = %def.units_dir.display(),
            "provider has no units directory"
        );
        return Ok(Vec::new());
    }
    let mut nodes = Vec::new();
    for file in collect_unit_files(&def.units_dir)? {
        let text = fs::read_to_string(&file)
            .with_context(|| format!("read unit file {}", file.display()))?;
        let records =
            parse_units(&text).with_context(|| format!("parse unit file {}", file.display()))?;
        for record in records {
            match unit_from_record(&record, &def.namespace) {
                Some(unit) => nodes.push(JobNode::Unit(unit)),
                None => tracing::warn!(
                    file = %file.display(),
                    line = record.line,
                    "unit record without id, skipped"
                ),
            }
        }
    }
    Ok(nodes)
}

fn collect_unit_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let path = entry
            .with_context(|| format!("read {}", root.display()))?
            .path();
        if path.is_dir() {
            files.extend(collect_unit_files(&path)?);
        } else if path.extension() == Some(OsStr::new("pxu")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn unit_from_record(record: &UnitRecord, namespace: &str) -> Option<UnitNode> {
    let raw_id = record.get("id")?;
    let id = if raw_id.contains("::") {
        raw_id.to_string()
    } else {
        format!("{namespace}::{raw_id}")
    };
    let partial_id = id.rsplit("::").next().unwrap_or(raw_id).to_string();
    let name = record
        .get("name")
        .or_else(|| record.get("summary"))
        .unwrap_or(&partial_id)
        .to_string();
    Some(UnitNode {
        unit: record.get("unit").unwrap_or("job").to_string(),
        id,
        partial_id,
        name,
        prompt: record.get("prompt").map(str::to_string),
        value_type: record.get("value-type").map(ValueType::from),
    })
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
