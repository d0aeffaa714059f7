//! # isa95-space
//!
//! A deterministic, in-memory typed node graph ("address space").
//!
//! This crate provides:
//! - `Node`, `NodeId`, `NodeClass` and the instance/type-definition split
//! - `AddressSpace`: namespace table, node and reference storage, type
//!   finders scoped by namespace, and the subtype-of query
//! - the built-in scalar registry and the per-space extension registry
//! - node-set document loading, with the standard base types bundled
//!
//! It knows nothing about any particular information model. Models are
//! layered on top by extensions (see `isa95-kernel`).

pub mod error;
pub mod node;
pub mod nodeset;
pub mod scalar;
pub mod space;
pub mod version;

pub use error::SpaceError;
pub use node::{ModellingRule, Node, NodeClass, NodeId, NodeKind, QualifiedName};
pub use nodeset::{NodeSetDocument, NodeSetEntry, NodeSetSummary, STANDARD_NODESET};
pub use scalar::{BuiltinType, ScalarRegistry, ScalarType};
pub use space::{
    AddressSpace, EnumField, ExtensionRegistry, Reference, STANDARD_NAMESPACE_URI,
    VariableDescriptor, standard,
};
pub use version::{HOST_VERSION, HostVersion};
