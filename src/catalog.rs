//! Job catalog model.
//!
//! The catalog is a tree: one root, one node per provider, and one leaf per
//! unit record found in that provider's unit files. Node kinds expose
//! different fields, so every accessor returns `Option` and a missing field
//! reads as "not applicable".
mod provider;
mod units;

pub use provider::{default_search_path, ProviderCatalog};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of the catalog tree.
pub trait Catalog {
    fn object_tree(&self) -> Result<JobNode>;
}

/// Expected answer shape of a manifest entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    Bool,
    Natural,
    Other(String),
}

impl ValueType {
    pub fn as_str(&self) -> &str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Natural => "natural",
            ValueType::Other(other) => other,
        }
    }
}

impl From<&str> for ValueType {
    fn from(value: &str) -> Self {
        match value.trim() {
            "bool" => ValueType::Bool,
            "natural" => ValueType::Natural,
            other => ValueType::Other(other.to_string()),
        }
    }
}

impl From<String> for ValueType {
    fn from(value: String) -> Self {
        ValueType::from(value.as_str())
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit record, already namespace-qualified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitNode {
    /// Unit kind, e.g. `job` or `manifest entry`.
    pub unit: String,
    pub id: String,
    pub partial_id: String,
    pub name: String,
    pub prompt: Option<String>,
    pub value_type: Option<ValueType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobNode {
    Root {
        name: String,
        children: Vec<JobNode>,
    },
    Provider {
        name: String,
        children: Vec<JobNode>,
    },
    Unit(UnitNode),
}

impl JobNode {
    pub fn group(&self) -> Option<&str> {
        match self {
            JobNode::Root { .. } => None,
            JobNode::Provider { .. } => Some("provider"),
            JobNode::Unit(unit) => Some(unit.unit.as_str()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            JobNode::Unit(unit) => Some(unit.id.as_str()),
            _ => None,
        }
    }

    pub fn partial_id(&self) -> Option<&str> {
        match self {
            JobNode::Unit(unit) => Some(unit.partial_id.as_str()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            JobNode::Root { name, .. } | JobNode::Provider { name, .. } => name,
            JobNode::Unit(unit) => &unit.name,
        }
    }

    /// Declared prompt; blank prompts count as absent.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            JobNode::Unit(unit) => unit
                .prompt
                .as_deref()
                .map(str::trim)
                .filter(|prompt| !prompt.is_empty()),
            _ => None,
        }
    }

    pub fn value_type(&self) -> Option<&ValueType> {
        match self {
            JobNode::Unit(unit) => unit.value_type.as_ref(),
            _ => None,
        }
    }

    pub fn children(&self) -> &[JobNode] {
        match self {
            JobNode::Root { children, .. } | JobNode::Provider { children, .. } => children,
            JobNode::Unit(_) => &[],
        }
    }
}
