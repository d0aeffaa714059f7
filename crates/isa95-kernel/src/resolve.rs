//! Type resolution for attachment requests.
//!
//! A type definition can be handed over three ways: by browse name, by node
//! id, or as a node the caller already holds. All three end at the same
//! [`NodeId`], which is then checked against the base type required by the
//! attachment category.

use crate::config::SubtypePolicy;
use crate::error::Isa95Error;
use crate::namespace::Isa95Lookup;
use isa95_space::{AddressSpace, BuiltinType, Node, NodeClass, NodeId, QualifiedName};

/// A type definition as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A variable type browse name, looked up in the ISA-95 namespace.
    Name(String),
    /// A node id, looked up directly.
    Id(NodeId),
    /// A node the caller resolved earlier.
    Node(NodeHandle),
}

/// A cheap, detached view of a node the caller already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub node_class: NodeClass,
}

impl From<&Node> for NodeHandle {
    fn from(node: &Node) -> Self {
        Self {
            node_id: node.node_id,
            browse_name: node.browse_name.clone(),
            node_class: node.node_class,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<NodeId> for TypeRef {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl From<&Node> for TypeRef {
    fn from(node: &Node) -> Self {
        Self::Node(node.into())
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
            Self::Node(handle) => write!(f, "{} ({})", handle.browse_name, handle.node_id),
        }
    }
}

/// A data type as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataTypeRef {
    Name(String),
    Id(NodeId),
}

impl From<&str> for DataTypeRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for DataTypeRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<NodeId> for DataTypeRef {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl From<BuiltinType> for DataTypeRef {
    fn from(builtin: BuiltinType) -> Self {
        Self::Id(builtin.node_id())
    }
}

impl std::fmt::Display for DataTypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Where a type name is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameScope {
    Isa95,
    Isa95ThenStandard,
}

fn lookup(
    space: &AddressSpace,
    type_ref: &TypeRef,
    scope: NameScope,
) -> Result<NodeId, Isa95Error> {
    let node = match type_ref {
        TypeRef::Name(name) => {
            let scoped = space.find_isa95_variable_type(name);
            let found = match scope {
                NameScope::Isa95 => scoped,
                NameScope::Isa95ThenStandard => {
                    scoped.or_else(|| space.find_variable_type(name, None))
                }
            };
            found.ok_or_else(|| Isa95Error::not_found("variable type", name.clone()))?
        }
        TypeRef::Id(id) => space
            .find_node(id)
            .ok_or_else(|| Isa95Error::not_found("node", id.to_string()))?,
        TypeRef::Node(handle) => {
            let node = space
                .find_node(&handle.node_id)
                .ok_or_else(|| Isa95Error::not_found("node", handle.node_id.to_string()))?;
            // a handle taken from another space can name a different node
            if node.node_class != handle.node_class || node.browse_name != handle.browse_name {
                return Err(Isa95Error::InvalidRequest(format!(
                    "node handle {} ({}) does not match {} in this space",
                    handle.browse_name, handle.node_id, node.browse_name
                )));
            }
            node
        }
    };

    if node.node_class != NodeClass::VariableType {
        return Err(Isa95Error::InvalidRequest(format!(
            "type definition {} is a {}, expected a VariableType",
            node.browse_name, node.node_class
        )));
    }
    Ok(node.node_id)
}

/// Resolve `type_ref` and check it against the ISA-95 variable type `base_type`.
///
/// The base type is a precondition: when it is missing from the ISA-95
/// namespace the call fails regardless of `policy`.
pub fn resolve_type(
    space: &AddressSpace,
    type_ref: &TypeRef,
    base_type: &str,
    policy: SubtypePolicy,
) -> Result<NodeId, Isa95Error> {
    let base = space
        .find_isa95_variable_type(base_type)
        .ok_or_else(|| Isa95Error::not_found("variable type", base_type))?
        .node_id;
    let resolved = lookup(space, type_ref, NameScope::Isa95)?;

    if !space.is_supertype_of(&base, &resolved) {
        let type_definition = space
            .find_node(&resolved)
            .map(|node| node.browse_name.to_string())
            .unwrap_or_else(|| resolved.to_string());
        match policy {
            SubtypePolicy::Strict => {
                return Err(Isa95Error::SubtypeViolation {
                    type_definition,
                    base_type: base_type.to_string(),
                });
            }
            SubtypePolicy::Lenient => {
                tracing::warn!(
                    %type_definition,
                    base_type,
                    "type definition is not a subtype of its base type; accepted"
                );
            }
        }
    }
    Ok(resolved)
}

/// Resolve the type definition of an attribute.
///
/// Attributes have no base type. Names are searched in the ISA-95
/// namespace first, then in the standard one; no type at all means
/// `BaseDataVariableType`.
pub fn resolve_attribute_type(
    space: &AddressSpace,
    type_ref: Option<&TypeRef>,
) -> Result<NodeId, Isa95Error> {
    match type_ref {
        Some(type_ref) => lookup(space, type_ref, NameScope::Isa95ThenStandard),
        None => space
            .find_variable_type("BaseDataVariableType", None)
            .map(|node| node.node_id)
            .ok_or_else(|| Isa95Error::not_found("variable type", "BaseDataVariableType")),
    }
}

/// Resolve a data type through the three-tier ISA-95 lookup.
pub fn resolve_data_type(
    space: &AddressSpace,
    data_type: &DataTypeRef,
) -> Result<NodeId, Isa95Error> {
    match data_type {
        DataTypeRef::Name(name) => space
            .resolve_isa95_data_type(name)
            .ok_or_else(|| Isa95Error::not_found("dataType", name.clone())),
        DataTypeRef::Id(id) => {
            let known = match space.find_node(id) {
                Some(node) => node.node_class == NodeClass::DataType,
                None => BuiltinType::ALL.iter().any(|builtin| builtin.node_id() == *id),
            };
            if known {
                Ok(*id)
            } else {
                Err(Isa95Error::not_found("dataType", id.to_string()))
            }
        }
    }
}
