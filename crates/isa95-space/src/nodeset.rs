//! Node-set documents: the portable, versioned description of a model.
//!
//! A document lists the namespace URIs it defines and its nodes. Node ids
//! inside the document use *local* namespace indexes: `i=<n>` (or `ns=0`)
//! is the standard namespace, `ns=1` is the first entry of
//! `namespaceUris`, and so on. Loading remaps them onto the space's table.

use crate::error::SpaceError;
use crate::node::{Node, NodeClass, NodeId, QualifiedName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The standard base types shipped with the space.
pub const STANDARD_NODESET: &str = include_str!("../nodesets/standard.nodeset.json");

pub const NODESET_SCHEMA: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeSetDocument {
    pub schema: u32,
    #[serde(default)]
    pub namespace_uris: Vec<String>,
    /// URI of the model this document defines.
    #[serde(default)]
    pub model_uri: Option<String>,
    pub version: String,
    #[serde(default)]
    pub publication_date: Option<String>,
    pub nodes: Vec<NodeSetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeSetEntry {
    pub node_id: NodeId,
    pub node_class: NodeClass,
    pub browse_name: String,
    #[serde(default)]
    pub subtype_of: Option<NodeId>,
    #[serde(default)]
    pub data_type: Option<NodeId>,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub description: Option<String>,
}

/// What a successful load added to the space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeSetSummary {
    pub namespace_uri: String,
    pub namespace_index: u16,
    pub version: String,
    pub node_count: usize,
}

impl NodeSetDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, SpaceError> {
        let document: Self =
            serde_json::from_str(raw).map_err(|e| SpaceError::NodeSet(e.to_string()))?;
        if document.schema != NODESET_SCHEMA {
            return Err(SpaceError::NodeSet(format!(
                "unsupported schema {} (expected {NODESET_SCHEMA})",
                document.schema
            )));
        }
        if let Some(model_uri) = &document.model_uri
            && !document.namespace_uris.contains(model_uri)
        {
            return Err(SpaceError::NodeSet(format!(
                "model uri {model_uri} is not listed in namespaceUris"
            )));
        }
        Ok(document)
    }

    /// Convert entries into nodes, remapping local namespace indexes.
    ///
    /// `index_map[local]` is the space index for local namespace `local`.
    pub fn resolve_nodes(&self, index_map: &[u16]) -> Result<Vec<Node>, SpaceError> {
        let remap = |id: NodeId| -> Result<NodeId, SpaceError> {
            index_map
                .get(usize::from(id.namespace))
                .map(|namespace| NodeId::new(*namespace, id.identifier))
                .ok_or_else(|| {
                    SpaceError::NodeSet(format!("{id} uses an undeclared namespace index"))
                })
        };

        self.nodes
            .iter()
            .map(|entry| {
                let node_id = remap(entry.node_id)?;
                let mut node = Node::new(
                    node_id,
                    QualifiedName::new(node_id.namespace, entry.browse_name.clone()),
                    entry.node_class,
                );
                node.subtype_of = entry.subtype_of.map(remap).transpose()?;
                node.data_type = entry.data_type.map(remap).transpose()?;
                node.value = entry.value.clone();
                Ok(node)
            })
            .collect()
    }
}
