//! Nodes of the address space.
//!
//! A node is identified by a [`NodeId`] (namespace index + numeric
//! identifier), carries a browse name, and belongs to exactly one
//! [`NodeClass`]. Type nodes additionally point at their supertype, which
//! is what the subtype-of partial order is computed from.

use crate::error::SpaceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque identifier of a node.
///
/// Rendered as `ns=<index>;i=<id>`, or `i=<id>` in the standard namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    pub namespace: u16,
    pub identifier: u32,
}

impl NodeId {
    pub const fn new(namespace: u16, identifier: u32) -> Self {
        Self {
            namespace,
            identifier,
        }
    }

    /// A node in the standard namespace (index 0).
    pub const fn standard(identifier: u32) -> Self {
        Self::new(0, identifier)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace == 0 {
            write!(f, "i={}", self.identifier)
        } else {
            write!(f, "ns={};i={}", self.namespace, self.identifier)
        }
    }
}

impl std::str::FromStr for NodeId {
    type Err = SpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpaceError::InvalidNodeId(s.to_string());
        let (namespace, rest) = match s.split_once(';') {
            Some((ns, rest)) => {
                let index = ns
                    .strip_prefix("ns=")
                    .ok_or_else(invalid)?
                    .parse::<u16>()
                    .map_err(|_| invalid())?;
                (index, rest)
            }
            None => (0, s),
        };
        let identifier = rest
            .strip_prefix("i=")
            .ok_or_else(invalid)?
            .parse::<u32>()
            .map_err(|_| invalid())?;
        Ok(Self::new(namespace, identifier))
    }
}

impl TryFrom<String> for NodeId {
    type Error = SpaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.to_string()
    }
}

/// A name qualified by the namespace that defines it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: u16, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace, self.name)
        }
    }
}

/// Node classes understood by the space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object,
    Variable,
    ObjectType,
    VariableType,
    DataType,
    ReferenceType,
}

impl NodeClass {
    /// Whether nodes of this class live in the instance or the type world.
    pub fn kind(self) -> NodeKind {
        match self {
            NodeClass::Object | NodeClass::Variable => NodeKind::Instance,
            NodeClass::ObjectType
            | NodeClass::VariableType
            | NodeClass::DataType
            | NodeClass::ReferenceType => NodeKind::TypeDefinition,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Object => "Object",
            NodeClass::Variable => "Variable",
            NodeClass::ObjectType => "ObjectType",
            NodeClass::VariableType => "VariableType",
            NodeClass::DataType => "DataType",
            NodeClass::ReferenceType => "ReferenceType",
        }
    }
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a node is a live instance or a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Instance,
    TypeDefinition,
}

/// How a child declared on a type definition propagates to instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModellingRule {
    Mandatory,
    Optional,
    MandatoryPlaceholder,
    OptionalPlaceholder,
    ExposesItsArray,
}

impl ModellingRule {
    pub fn as_str(self) -> &'static str {
        match self {
            ModellingRule::Mandatory => "Mandatory",
            ModellingRule::Optional => "Optional",
            ModellingRule::MandatoryPlaceholder => "MandatoryPlaceholder",
            ModellingRule::OptionalPlaceholder => "OptionalPlaceholder",
            ModellingRule::ExposesItsArray => "ExposesItsArray",
        }
    }
}

impl std::fmt::Display for ModellingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModellingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mandatory" => Ok(Self::Mandatory),
            "optional" => Ok(Self::Optional),
            "mandatoryplaceholder" | "mandatory_placeholder" => Ok(Self::MandatoryPlaceholder),
            "optionalplaceholder" | "optional_placeholder" => Ok(Self::OptionalPlaceholder),
            "exposesitsarray" | "exposes_its_array" => Ok(Self::ExposesItsArray),
            _ => Err(format!("unknown modelling rule: {s}")),
        }
    }
}

/// One node of the address space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub node_class: NodeClass,
    /// Instances only: the type this node was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_definition: Option<NodeId>,
    /// Types only: the direct supertype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype_of: Option<NodeId>,
    /// Variables and variable types only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelling_rule: Option<ModellingRule>,
    /// Named children bound onto this node, by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, NodeId>,
}

impl Node {
    /// A bare node with no type information attached yet.
    pub fn new(node_id: NodeId, browse_name: QualifiedName, node_class: NodeClass) -> Self {
        Self {
            node_id,
            browse_name,
            node_class,
            type_definition: None,
            subtype_of: None,
            data_type: None,
            value: Value::Null,
            modelling_rule: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.node_class.kind()
    }

    pub fn is_type_definition(&self) -> bool {
        self.kind() == NodeKind::TypeDefinition
    }

    /// Child bound under `name`, if any.
    pub fn field(&self, name: &str) -> Option<NodeId> {
        self.fields.get(name).copied()
    }
}
