//! Lookups scoped to the ISA-95 namespace.

use isa95_space::{AddressSpace, Node, NodeClass, NodeId};

pub const ISA95_NAMESPACE_URI: &str = "http://www.OPCFoundation.org/UA/2013/01/ISA95";

/// ISA-95 finders layered over an [`AddressSpace`].
///
/// Every finder returns `None` when the ISA-95 namespace is not registered,
/// which is the state of a space the extension was never installed into.
pub trait Isa95Lookup {
    /// Index of the ISA-95 namespace in this space.
    fn isa95_namespace(&self) -> Option<u16>;

    fn find_isa95_reference_type(&self, name: &str) -> Option<&Node>;

    fn find_isa95_object_type(&self, name: &str) -> Option<&Node>;

    fn find_isa95_variable_type(&self, name: &str) -> Option<&Node>;

    fn find_isa95_data_type(&self, name: &str) -> Option<&Node>;

    /// Resolve a data type name, most specific namespace first:
    ///
    /// 1. the ISA-95 namespace,
    /// 2. the standard namespace,
    /// 3. the space's built-in scalar registry.
    fn resolve_isa95_data_type(&self, name: &str) -> Option<NodeId>;
}

impl Isa95Lookup for AddressSpace {
    fn isa95_namespace(&self) -> Option<u16> {
        self.namespace_index(ISA95_NAMESPACE_URI)
    }

    fn find_isa95_reference_type(&self, name: &str) -> Option<&Node> {
        self.find_reference_type(name, Some(self.isa95_namespace()?))
    }

    fn find_isa95_object_type(&self, name: &str) -> Option<&Node> {
        self.find_object_type(name, Some(self.isa95_namespace()?))
    }

    fn find_isa95_variable_type(&self, name: &str) -> Option<&Node> {
        self.find_variable_type(name, Some(self.isa95_namespace()?))
    }

    fn find_isa95_data_type(&self, name: &str) -> Option<&Node> {
        self.find_data_type(name, Some(self.isa95_namespace()?))
    }

    fn resolve_isa95_data_type(&self, name: &str) -> Option<NodeId> {
        self.find_isa95_data_type(name)
            .or_else(|| self.find_data_type(name, None))
            .map(|node| node.node_id)
            .or_else(|| self.scalars().get(name).map(|scalar| scalar.data_type_id()))
    }
}

/// ISA-95 types of one node class, in id order.
pub fn isa95_types(space: &AddressSpace, class: NodeClass) -> Vec<&Node> {
    let Some(namespace) = space.isa95_namespace() else {
        return Vec::new();
    };
    space
        .nodes_in_namespace(namespace)
        .filter(|node| node.node_class == class)
        .collect()
}
