//! Node-type registry.
//!
//! The registry is authoritative: callers hand nodes only type keys that
//! exist in it. A missing key is a programming error surfaced as
//! [`RegistryError::UnknownType`] at lookup time.

use crate::id::NodeTypeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown node type `{0}`")]
    UnknownType(NodeTypeId),
}

/// One input or output port of a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    #[serde(rename = "type")]
    pub port_type: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
}

pub type Ports = SmallVec<[PortSpec; 4]>;

/// Display metadata for a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeType {
    #[serde(rename = "type")]
    pub key: NodeTypeId,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub inputs: Ports,
    #[serde(default)]
    pub outputs: Ports,
    /// `None` counts as addable; only an explicit `false` hides the type from the menu.
    #[serde(default)]
    pub addable: Option<bool>,
    #[serde(default)]
    pub sort_index: Option<i32>,
}

impl NodeType {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: NodeTypeId::intern(key),
            label: label.to_string(),
            description: None,
            inputs: Ports::new(),
            outputs: Ports::new(),
            addable: None,
            sort_index: None,
        }
    }

    pub fn is_addable(&self) -> bool {
        self.addable != Some(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    types: HashMap<NodeTypeId, NodeType>,
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON array of node types.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let types: Vec<NodeType> = serde_json::from_str(json)?;
        Ok(types.into_iter().collect())
    }

    /// Add or replace a type definition.
    pub fn register(&mut self, node_type: NodeType) {
        log::debug!("registering node type {:?}", node_type.key);
        self.types.insert(node_type.key, node_type);
    }

    pub fn get(&self, key: NodeTypeId) -> Result<&NodeType, RegistryError> {
        self.types.get(&key).ok_or(RegistryError::UnknownType(key))
    }

    pub fn contains(&self, key: NodeTypeId) -> bool {
        self.types.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all registered types, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }
}

impl FromIterator<NodeType> for NodeTypeRegistry {
    fn from_iter<I: IntoIterator<Item = NodeType>>(iter: I) -> Self {
        let mut registry = Self::new();
        for node_type in iter {
            registry.register(node_type);
        }
        registry
    }
}
