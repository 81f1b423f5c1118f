//! Manifest entries: selection from the catalog and prompt grouping.
//!
//! Only units of kind `manifest entry` whose id is on the known hardware
//! list take part. Entries are grouped under the question shown to the
//! operator; groups keep first-seen order and entries keep traversal order.
mod persist;

pub use persist::save_manifest;

use crate::catalog::{JobNode, ValueType};
use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

pub const MANIFEST_ENTRY_GROUP: &str = "manifest entry";
pub const DEFAULT_BOOL_PROMPT: &str = "Does this machine have this piece of hardware?";
pub const DEFAULT_NATURAL_PROMPT: &str = "Please enter the requested data:";

static KNOWN_MANIFEST_IDS: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    [
        "com.canonical.certification::has_wwan_module",
        "com.canonical.certification::has_ethernet_adapter",
        "com.canonical.certification::has_camera",
        "com.canonical.certification::has_usb_storage",
        "com.canonical.certification::has_tpm2_chip",
        "com.canonical.certification::has_wlan_adapter",
        "com.canonical.certification::has_bt_smart",
        "com.canonical.certification::has_card_reader",
        "com.canonical.certification::has_dp",
        "com.canonical.certification::has_dvi",
        "com.canonical.certification::has_fingerprint_reader",
        "com.canonical.certification::has_hdmi",
        "com.canonical.certification::has_special_keys",
        "com.canonical.certification::has_thunderbolt3",
        "com.canonical.certification::has_touchpad",
        "com.canonical.certification::has_touchscreen",
        "com.canonical.certification::has_usbc_data",
        "com.canonical.certification::has_usbc_video",
        "com.canonical.certification::has_vga",
    ]
    .into_iter()
    .collect()
});

pub fn is_known_manifest_id(id: &str) -> bool {
    KNOWN_MANIFEST_IDS.contains(id)
}

/// Flat answer set keyed by entry id; unanswered entries map to `null`.
pub type Answers = BTreeMap<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Natural(u64),
}

impl From<AnswerValue> for Value {
    fn from(value: AnswerValue) -> Self {
        match value {
            AnswerValue::Bool(flag) => Value::Bool(flag),
            AnswerValue::Natural(number) => Value::from(number),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub partial_id: String,
    pub name: String,
    pub value_type: Option<ValueType>,
    pub value: Option<AnswerValue>,
}

impl ManifestEntry {
    fn from_node(node: &JobNode, id: &str) -> Self {
        Self {
            id: id.to_string(),
            partial_id: node.partial_id().unwrap_or(id).to_string(),
            name: node.name().to_string(),
            value_type: node.value_type().cloned(),
            value: None,
        }
    }

    pub fn is_bool(&self) -> bool {
        self.value_type == Some(ValueType::Bool)
    }

    pub fn is_natural(&self) -> bool {
        self.value_type == Some(ValueType::Natural)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestGroup {
    pub prompt: String,
    pub entries: Vec<ManifestEntry>,
}

/// Entries grouped by prompt, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManifestGroups {
    groups: Vec<ManifestGroup>,
}

impl ManifestGroups {
    pub fn push(&mut self, prompt: String, entry: ManifestEntry) {
        match self.groups.iter_mut().find(|group| group.prompt == prompt) {
            Some(group) => group.entries.push(entry),
            None => self.groups.push(ManifestGroup {
                prompt,
                entries: vec![entry],
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestGroup> {
        self.groups.iter()
    }

    pub fn groups_mut(&mut self) -> &mut [ManifestGroup] {
        &mut self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    /// Flatten to id -> value. A later duplicate id overrides an earlier one.
    pub fn answers(&self) -> Answers {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter())
            .map(|entry| (entry.id.clone(), entry.value.map_or(Value::Null, Value::from)))
            .collect()
    }
}

/// Walk the whole tree and group every known manifest entry by its prompt.
pub fn collect_manifest_entries(root: &JobNode) -> Result<ManifestGroups> {
    let mut groups = ManifestGroups::default();
    visit(root, &mut groups)?;
    Ok(groups)
}

fn visit(node: &JobNode, groups: &mut ManifestGroups) -> Result<()> {
    if node.group() == Some(MANIFEST_ENTRY_GROUP) {
        tracing::debug!(name = node.name(), "manifest entry");
        if let Some(id) = node.id().filter(|id| is_known_manifest_id(id)) {
            let prompt = resolve_prompt(node)?;
            groups.push(prompt, ManifestEntry::from_node(node, id));
        }
    }
    for child in node.children() {
        visit(child, groups)?;
    }
    Ok(())
}

/// Question text for a manifest entry: the declared prompt, else a default
/// for the value type.
pub fn resolve_prompt(node: &JobNode) -> Result<String> {
    if let Some(prompt) = node.prompt() {
        return Ok(prompt.to_string());
    }
    match node.value_type() {
        Some(ValueType::Bool) => Ok(DEFAULT_BOOL_PROMPT.to_string()),
        Some(ValueType::Natural) => Ok(DEFAULT_NATURAL_PROMPT.to_string()),
        other => bail!(
            "manifest entry {} has no prompt and no default for value type {}",
            node.id().unwrap_or("<unknown>"),
            other.map_or("<unset>", ValueType::as_str)
        ),
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
