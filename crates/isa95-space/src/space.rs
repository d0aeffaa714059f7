//! The address space: the node graph every extension builds on.
//!
//! Nodes are indexed by id and by `(class, namespace, browse name)`, so the
//! type finders are plain map lookups. References are kept as an ordered
//! list of triples; adding the same triple twice stores it twice.

use crate::error::SpaceError;
use crate::node::{ModellingRule, Node, NodeClass, NodeId, QualifiedName};
use crate::nodeset::{NodeSetDocument, NodeSetSummary, STANDARD_NODESET};
use crate::scalar::{BuiltinType, ScalarRegistry};
use crate::version::HostVersion;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const STANDARD_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

/// Well-known nodes of the standard namespace.
pub mod standard {
    use crate::node::NodeId;

    pub const BASE_DATA_TYPE: NodeId = NodeId::standard(24);
    pub const ENUMERATION: NodeId = NodeId::standard(29);
    pub const REFERENCES: NodeId = NodeId::standard(31);
    pub const HAS_SUBTYPE: NodeId = NodeId::standard(45);
    pub const BASE_OBJECT_TYPE: NodeId = NodeId::standard(58);
    pub const BASE_VARIABLE_TYPE: NodeId = NodeId::standard(62);
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::standard(63);
    pub const PROPERTY_TYPE: NodeId = NodeId::standard(68);
}

/// A directed, typed edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub source: NodeId,
    pub reference_type: NodeId,
    pub target: NodeId,
}

/// Everything needed to create a variable in the own namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDescriptor {
    pub browse_name: String,
    pub type_definition: NodeId,
    pub data_type: NodeId,
    pub value: Value,
    pub modelling_rule: Option<ModellingRule>,
}

/// A named value of a registered enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumField {
    pub name: String,
    pub value: i32,
}

/// Extensions installed into one space, with the version each installed.
///
/// Installation state lives here rather than in any process-wide place, so
/// two spaces never observe each other's extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionRegistry {
    installed: BTreeMap<String, String>,
}

impl ExtensionRegistry {
    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    /// Record `name` as installed. Returns false if it already was.
    pub fn record(&mut self, name: impl Into<String>, version: impl Into<String>) -> bool {
        let name = name.into();
        if self.installed.contains_key(&name) {
            return false;
        }
        self.installed.insert(name, version.into());
        true
    }

    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.installed.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.installed.keys().map(String::as_str)
    }
}

type NameKey = (NodeClass, u16, String);

/// Canonical in-memory node graph.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    namespaces: Vec<String>,
    own_namespace: u16,
    nodes: BTreeMap<NodeId, Node>,
    by_name: BTreeMap<NameKey, NodeId>,
    references: Vec<Reference>,
    next_identifier: BTreeMap<u16, u32>,
    scalars: ScalarRegistry,
    enumerations: BTreeMap<String, Vec<EnumField>>,
    extensions: ExtensionRegistry,
    host_version: HostVersion,
}

impl AddressSpace {
    /// A space with only the namespace table populated.
    ///
    /// Index 0 is the standard namespace, index 1 is `own_namespace_uri`,
    /// where [`AddressSpace::add_variable`] and friends create nodes.
    pub fn empty(own_namespace_uri: impl Into<String>) -> Self {
        Self {
            namespaces: vec![STANDARD_NAMESPACE_URI.to_string(), own_namespace_uri.into()],
            own_namespace: 1,
            nodes: BTreeMap::new(),
            by_name: BTreeMap::new(),
            references: Vec::new(),
            next_identifier: BTreeMap::new(),
            scalars: ScalarRegistry::default(),
            enumerations: BTreeMap::new(),
            extensions: ExtensionRegistry::default(),
            host_version: HostVersion::current(),
        }
    }

    /// A space preloaded with the standard base types.
    pub fn with_standard_nodes(own_namespace_uri: impl Into<String>) -> Result<Self, SpaceError> {
        let mut space = Self::empty(own_namespace_uri);
        let document = NodeSetDocument::from_json_str(STANDARD_NODESET)?;
        space.load_nodeset(&document)?;
        Ok(space)
    }

    /// Report a different host version to extensions.
    pub fn with_host_version(mut self, version: HostVersion) -> Self {
        self.host_version = version;
        self
    }

    /// Start from an existing extension registry.
    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn host_version(&self) -> HostVersion {
        self.host_version
    }

    // ── namespaces ──────────────────────────────────────────────────────

    pub fn own_namespace(&self) -> u16 {
        self.own_namespace
    }

    pub fn namespace_index(&self, uri: &str) -> Option<u16> {
        self.namespaces
            .iter()
            .position(|candidate| candidate == uri)
            .and_then(|index| u16::try_from(index).ok())
    }

    pub fn namespace_uri(&self, index: u16) -> Option<&str> {
        self.namespaces.get(usize::from(index)).map(String::as_str)
    }

    pub fn namespace_uris(&self) -> &[String] {
        &self.namespaces
    }

    /// Index of `uri`, appending it to the table when new.
    pub fn register_namespace(&mut self, uri: &str) -> Result<u16, SpaceError> {
        if let Some(index) = self.namespace_index(uri) {
            return Ok(index);
        }
        let index = u16::try_from(self.namespaces.len())
            .map_err(|_| SpaceError::UnknownNamespace(uri.to_string()))?;
        self.namespaces.push(uri.to_string());
        Ok(index)
    }

    // ── nodes ───────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn find_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate nodes of one namespace in id order.
    pub fn nodes_in_namespace(&self, namespace: u16) -> impl Iterator<Item = &Node> {
        self.nodes
            .values()
            .filter(move |node| node.node_id.namespace == namespace)
    }

    /// Insert a fully-formed node.
    pub fn insert_node(&mut self, node: Node) -> Result<(), SpaceError> {
        if self.nodes.contains_key(&node.node_id) {
            return Err(SpaceError::DuplicateNode(node.node_id));
        }
        if self.namespace_uri(node.node_id.namespace).is_none() {
            return Err(SpaceError::UnknownNamespace(format!(
                "ns={}",
                node.node_id.namespace
            )));
        }
        let key = (
            node.node_class,
            node.browse_name.namespace,
            node.browse_name.name.clone(),
        );
        // first node under a name keeps the index entry
        self.by_name.entry(key).or_insert(node.node_id);
        self.nodes.insert(node.node_id, node);
        Ok(())
    }

    fn find_by_name(&self, class: NodeClass, name: &str, namespace: Option<u16>) -> Option<&Node> {
        let key = (class, namespace.unwrap_or(0), name.to_string());
        self.by_name.get(&key).and_then(|id| self.nodes.get(id))
    }

    /// Find a ReferenceType by browse name; `None` searches the standard namespace.
    pub fn find_reference_type(&self, name: &str, namespace: Option<u16>) -> Option<&Node> {
        self.find_by_name(NodeClass::ReferenceType, name, namespace)
    }

    pub fn find_object_type(&self, name: &str, namespace: Option<u16>) -> Option<&Node> {
        self.find_by_name(NodeClass::ObjectType, name, namespace)
    }

    pub fn find_variable_type(&self, name: &str, namespace: Option<u16>) -> Option<&Node> {
        self.find_by_name(NodeClass::VariableType, name, namespace)
    }

    pub fn find_data_type(&self, name: &str, namespace: Option<u16>) -> Option<&Node> {
        self.find_by_name(NodeClass::DataType, name, namespace)
    }

    /// Whether `candidate` equals `base` or is a transitive subtype of it.
    pub fn is_supertype_of(&self, base: &NodeId, candidate: &NodeId) -> bool {
        let mut current = Some(*candidate);
        // a chain longer than the node count means a cycle
        for _ in 0..=self.nodes.len() {
            match current {
                Some(id) if id == *base => return true,
                Some(id) => current = self.nodes.get(&id).and_then(|node| node.subtype_of),
                None => return false,
            }
        }
        false
    }

    fn allocate_node_id(&mut self, namespace: u16) -> NodeId {
        let next = self.next_identifier.entry(namespace).or_insert(1000);
        loop {
            let candidate = NodeId::new(namespace, *next);
            *next += 1;
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn require(&self, id: &NodeId) -> Result<&Node, SpaceError> {
        self.nodes.get(id).ok_or(SpaceError::NodeNotFound(*id))
    }

    fn require_class(&self, id: &NodeId, class: NodeClass) -> Result<&Node, SpaceError> {
        let node = self.require(id)?;
        if node.node_class != class {
            return Err(SpaceError::NodeNotFound(*id));
        }
        Ok(node)
    }

    fn is_known_data_type(&self, id: &NodeId) -> bool {
        match self.nodes.get(id) {
            Some(node) => node.node_class == NodeClass::DataType,
            None => {
                id.namespace == 0
                    && BuiltinType::ALL
                        .iter()
                        .any(|builtin| builtin.node_id() == *id)
            }
        }
    }

    /// Create a variable in the own namespace.
    pub fn add_variable(&mut self, descriptor: VariableDescriptor) -> Result<NodeId, SpaceError> {
        self.require_class(&descriptor.type_definition, NodeClass::VariableType)?;
        if !self.is_known_data_type(&descriptor.data_type) {
            return Err(SpaceError::NodeNotFound(descriptor.data_type));
        }

        let namespace = self.own_namespace;
        let node_id = self.allocate_node_id(namespace);
        let mut node = Node::new(
            node_id,
            QualifiedName::new(namespace, descriptor.browse_name),
            NodeClass::Variable,
        );
        node.type_definition = Some(descriptor.type_definition);
        node.data_type = Some(descriptor.data_type);
        node.value = descriptor.value;
        node.modelling_rule = descriptor.modelling_rule;

        tracing::debug!(node = %node_id, browse_name = %node.browse_name, "variable added");
        self.insert_node(node)?;
        Ok(node_id)
    }

    /// Create an object instance in the own namespace.
    pub fn add_object(
        &mut self,
        browse_name: impl Into<String>,
        type_definition: NodeId,
    ) -> Result<NodeId, SpaceError> {
        self.require_class(&type_definition, NodeClass::ObjectType)?;
        let namespace = self.own_namespace;
        let node_id = self.allocate_node_id(namespace);
        let mut node = Node::new(
            node_id,
            QualifiedName::new(namespace, browse_name),
            NodeClass::Object,
        );
        node.type_definition = Some(type_definition);
        self.insert_node(node)?;
        Ok(node_id)
    }

    /// Create a type node of `class` in the own namespace, below `subtype_of`.
    pub fn add_type(
        &mut self,
        class: NodeClass,
        browse_name: impl Into<String>,
        subtype_of: NodeId,
    ) -> Result<NodeId, SpaceError> {
        let supertype = self.require(&subtype_of)?;
        if supertype.node_class != class || !node_class_is_type(class) {
            return Err(SpaceError::NodeNotFound(subtype_of));
        }
        let data_type = supertype.data_type;
        let namespace = self.own_namespace;
        let node_id = self.allocate_node_id(namespace);
        let mut node = Node::new(node_id, QualifiedName::new(namespace, browse_name), class);
        node.subtype_of = Some(subtype_of);
        node.data_type = data_type;
        self.insert_node(node)?;
        Ok(node_id)
    }

    // ── references ──────────────────────────────────────────────────────

    /// Add `source --reference_type--> target`.
    pub fn add_reference(
        &mut self,
        source: NodeId,
        reference_type: NodeId,
        target: NodeId,
    ) -> Result<(), SpaceError> {
        self.require(&source)?;
        self.require(&target)?;
        if self.require(&reference_type)?.node_class != NodeClass::ReferenceType {
            return Err(SpaceError::NotAReferenceType(reference_type));
        }
        tracing::debug!(%source, %reference_type, %target, "reference added");
        self.references.push(Reference {
            source,
            reference_type,
            target,
        });
        Ok(())
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Outgoing references of `source`, in insertion order.
    pub fn references_from(&self, source: NodeId) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(move |reference| reference.source == source)
    }

    /// Incoming references of `target`, in insertion order.
    pub fn references_to(&self, target: NodeId) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(move |reference| reference.target == target)
    }

    // ── fields ──────────────────────────────────────────────────────────

    /// Bind `child` onto `parent` under `name`, returning the previous binding.
    pub fn bind_field(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        child: NodeId,
    ) -> Result<Option<NodeId>, SpaceError> {
        self.require(&child)?;
        let node = self
            .nodes
            .get_mut(&parent)
            .ok_or(SpaceError::NodeNotFound(parent))?;
        Ok(node.fields.insert(name.into(), child))
    }

    pub fn field(&self, parent: &NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(parent).and_then(|node| node.field(name))
    }

    // ── registries ──────────────────────────────────────────────────────

    pub fn scalars(&self) -> &ScalarRegistry {
        &self.scalars
    }

    pub fn scalars_mut(&mut self) -> &mut ScalarRegistry {
        &mut self.scalars
    }

    /// Register (or replace) the named values of an enumeration.
    pub fn register_enumeration(&mut self, name: impl Into<String>, fields: Vec<EnumField>) {
        self.enumerations.insert(name.into(), fields);
    }

    pub fn enumeration(&self, name: &str) -> Option<&[EnumField]> {
        self.enumerations.get(name).map(Vec::as_slice)
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.extensions
    }

    // ── node sets ───────────────────────────────────────────────────────

    /// Load a node-set document.
    ///
    /// The document is validated in full before the first node is inserted,
    /// so a rejected document leaves the space untouched.
    pub fn load_nodeset(
        &mut self,
        document: &NodeSetDocument,
    ) -> Result<NodeSetSummary, SpaceError> {
        // local index -> space index; local 0 is always the standard namespace
        let mut index_map = vec![0u16];
        let mut appended: Vec<&str> = Vec::new();
        for uri in &document.namespace_uris {
            let index = match self.namespace_index(uri) {
                Some(index) => index,
                None => {
                    let position = appended
                        .iter()
                        .position(|seen| *seen == uri.as_str())
                        .unwrap_or_else(|| {
                            appended.push(uri.as_str());
                            appended.len() - 1
                        });
                    u16::try_from(self.namespaces.len() + position)
                        .map_err(|_| SpaceError::UnknownNamespace(uri.clone()))?
                }
            };
            index_map.push(index);
        }

        let nodes = document.resolve_nodes(&index_map)?;
        let mut pending = BTreeMap::new();
        for node in &nodes {
            if self.nodes.contains_key(&node.node_id)
                || pending.insert(node.node_id, node.node_class).is_some()
            {
                return Err(SpaceError::DuplicateNode(node.node_id));
            }
        }
        for node in &nodes {
            if let Some(supertype) = node.subtype_of {
                let class = pending
                    .get(&supertype)
                    .copied()
                    .or_else(|| self.nodes.get(&supertype).map(|n| n.node_class));
                if class != Some(node.node_class) {
                    return Err(SpaceError::NodeSet(format!(
                        "{} ({}) has unknown supertype {supertype}",
                        node.browse_name, node.node_id
                    )));
                }
            }
        }

        for uri in &document.namespace_uris {
            self.register_namespace(uri)?;
        }
        let node_count = nodes.len();
        for node in nodes {
            self.insert_node(node)?;
        }

        let summary = NodeSetSummary {
            namespace_uri: document
                .model_uri
                .clone()
                .unwrap_or_else(|| STANDARD_NAMESPACE_URI.to_string()),
            namespace_index: document
                .model_uri
                .as_deref()
                .and_then(|uri| self.namespace_index(uri))
                .unwrap_or(0),
            version: document.version.clone(),
            node_count,
        };
        tracing::debug!(
            namespace = %summary.namespace_uri,
            nodes = summary.node_count,
            "node set loaded"
        );
        Ok(summary)
    }
}

fn node_class_is_type(class: NodeClass) -> bool {
    class.kind() == crate::node::NodeKind::TypeDefinition
}
