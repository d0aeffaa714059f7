//! Built-in scalar types and the registry of named scalars.
//!
//! The registry is the last resort when a data type name is resolved: it
//! knows the standard built-in scalars even when their DataType nodes were
//! never loaded, plus any aliases registered by extensions.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The standard built-in scalar types, keyed by their numeric id in the
/// standard namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuiltinType {
    Boolean = 1,
    SByte = 2,
    Byte = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
    DateTime = 13,
    Guid = 14,
    ByteString = 15,
    XmlElement = 16,
    NodeId = 17,
    ExpandedNodeId = 18,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
    ExtensionObject = 22,
    DataValue = 23,
    Variant = 24,
    DiagnosticInfo = 25,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 25] = [
        BuiltinType::Boolean,
        BuiltinType::SByte,
        BuiltinType::Byte,
        BuiltinType::Int16,
        BuiltinType::UInt16,
        BuiltinType::Int32,
        BuiltinType::UInt32,
        BuiltinType::Int64,
        BuiltinType::UInt64,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::String,
        BuiltinType::DateTime,
        BuiltinType::Guid,
        BuiltinType::ByteString,
        BuiltinType::XmlElement,
        BuiltinType::NodeId,
        BuiltinType::ExpandedNodeId,
        BuiltinType::StatusCode,
        BuiltinType::QualifiedName,
        BuiltinType::LocalizedText,
        BuiltinType::ExtensionObject,
        BuiltinType::DataValue,
        BuiltinType::Variant,
        BuiltinType::DiagnosticInfo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Boolean => "Boolean",
            BuiltinType::SByte => "SByte",
            BuiltinType::Byte => "Byte",
            BuiltinType::Int16 => "Int16",
            BuiltinType::UInt16 => "UInt16",
            BuiltinType::Int32 => "Int32",
            BuiltinType::UInt32 => "UInt32",
            BuiltinType::Int64 => "Int64",
            BuiltinType::UInt64 => "UInt64",
            BuiltinType::Float => "Float",
            BuiltinType::Double => "Double",
            BuiltinType::String => "String",
            BuiltinType::DateTime => "DateTime",
            BuiltinType::Guid => "Guid",
            BuiltinType::ByteString => "ByteString",
            BuiltinType::XmlElement => "XmlElement",
            BuiltinType::NodeId => "NodeId",
            BuiltinType::ExpandedNodeId => "ExpandedNodeId",
            BuiltinType::StatusCode => "StatusCode",
            BuiltinType::QualifiedName => "QualifiedName",
            BuiltinType::LocalizedText => "LocalizedText",
            BuiltinType::ExtensionObject => "ExtensionObject",
            BuiltinType::DataValue => "DataValue",
            BuiltinType::Variant => "Variant",
            BuiltinType::DiagnosticInfo => "DiagnosticInfo",
        }
    }

    /// The DataType node id of this scalar in the standard namespace.
    pub fn node_id(self) -> NodeId {
        NodeId::standard(self as u32)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }
}

/// A named scalar: either a built-in or an alias over one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarType {
    pub name: String,
    pub subtype_of: BuiltinType,
    #[serde(default)]
    pub default_value: Value,
}

impl ScalarType {
    /// Data type id a variable of this scalar is created with.
    pub fn data_type_id(&self) -> NodeId {
        self.subtype_of.node_id()
    }
}

/// Name -> scalar lookup table.
#[derive(Debug, Clone)]
pub struct ScalarRegistry {
    scalars: BTreeMap<String, ScalarType>,
}

impl Default for ScalarRegistry {
    fn default() -> Self {
        let scalars = BuiltinType::ALL
            .into_iter()
            .map(|builtin| {
                (
                    builtin.name().to_string(),
                    ScalarType {
                        name: builtin.name().to_string(),
                        subtype_of: builtin,
                        default_value: Value::Null,
                    },
                )
            })
            .collect();
        Self { scalars }
    }
}

impl ScalarRegistry {
    /// Register an alias over a built-in scalar.
    ///
    /// Returns the previous registration under the same name, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        subtype_of: BuiltinType,
        default_value: Value,
    ) -> Option<ScalarType> {
        let name = name.into();
        self.scalars.insert(
            name.clone(),
            ScalarType {
                name,
                subtype_of,
                default_value,
            },
        )
    }

    pub fn get(&self, name: &str) -> Option<&ScalarType> {
        self.scalars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scalars.contains_key(name)
    }

    /// Iterate registrations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ScalarType> {
        self.scalars.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_preloaded() {
        let registry = ScalarRegistry::default();
        let int32 = registry.get("Int32").unwrap();
        assert_eq!(int32.data_type_id(), NodeId::standard(6));
        assert_eq!(registry.iter().count(), BuiltinType::ALL.len());
    }

    #[test]
    fn alias_resolves_to_its_builtin() {
        let mut registry = ScalarRegistry::default();
        assert!(
            registry
                .register("Identifier", BuiltinType::String, Value::Null)
                .is_none()
        );
        let alias = registry.get("Identifier").unwrap();
        assert_eq!(alias.data_type_id(), BuiltinType::String.node_id());
    }

    #[test]
    fn builtin_names_are_unique() {
        for builtin in BuiltinType::ALL {
            assert_eq!(BuiltinType::from_name(builtin.name()), Some(builtin));
        }
    }
}
