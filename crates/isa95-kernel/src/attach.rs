//! Typed attachment of ISA-95 class-properties, properties and attributes.
//!
//! Each operation runs in two steps. Planning resolves every type, checks
//! every precondition and touches nothing. Committing then adds exactly one
//! variable and one reference (plus, for attributes, the field binding).
//! A request that fails therefore leaves the space as it found it.

use crate::config::{ExtensionConfig, FieldCollisionPolicy};
use crate::error::Isa95Error;
use crate::namespace::Isa95Lookup;
use crate::resolve::{DataTypeRef, TypeRef, resolve_attribute_type, resolve_data_type, resolve_type};
use isa95_space::{AddressSpace, ModellingRule, NodeId, VariableDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three kinds of ISA-95 children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentCategory {
    ClassProperty,
    Property,
    Attribute,
}

impl AttachmentCategory {
    /// Variable type every type definition of this category must derive from.
    pub fn base_type(self) -> Option<&'static str> {
        match self {
            AttachmentCategory::ClassProperty => Some("ISA95ClassPropertyType"),
            AttachmentCategory::Property => Some("ISA95PropertyType"),
            AttachmentCategory::Attribute => None,
        }
    }

    /// ISA-95 reference type linking parent to child.
    pub fn reference_type(self) -> &'static str {
        match self {
            AttachmentCategory::ClassProperty => "HasISA95ClassProperty",
            AttachmentCategory::Property => "HasISA95Property",
            AttachmentCategory::Attribute => "HasISA95Attribute",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentCategory::ClassProperty => "class-property",
            AttachmentCategory::Property => "property",
            AttachmentCategory::Attribute => "attribute",
        }
    }
}

impl std::fmt::Display for AttachmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttachmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class-property" | "class_property" | "classproperty" => Ok(Self::ClassProperty),
            "property" => Ok(Self::Property),
            "attribute" => Ok(Self::Attribute),
            _ => Err(format!("unknown attachment category: {s}")),
        }
    }
}

/// A generic containment relation. ISA-95 attachment replaces these, so a
/// request carrying one is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    ComponentOf(NodeId),
    OrganizedBy(NodeId),
    PropertyOf(NodeId),
}

impl Containment {
    fn option_name(self) -> &'static str {
        match self {
            Containment::ComponentOf(_) => "componentOf",
            Containment::OrganizedBy(_) => "organizedBy",
            Containment::PropertyOf(_) => "propertyOf",
        }
    }
}

/// Options of one attachment call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachmentRequest {
    pub parent: Option<NodeId>,
    pub browse_name: Option<String>,
    pub data_type: Option<DataTypeRef>,
    pub type_definition: Option<TypeRef>,
    pub value: Value,
    pub modelling_rule: Option<ModellingRule>,
    pub containment: Option<Containment>,
}

impl AttachmentRequest {
    pub fn new(parent: NodeId, browse_name: impl Into<String>) -> Self {
        Self {
            parent: Some(parent),
            browse_name: Some(browse_name.into()),
            ..Self::default()
        }
    }

    pub fn data_type(mut self, data_type: impl Into<DataTypeRef>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn type_definition(mut self, type_definition: impl Into<TypeRef>) -> Self {
        self.type_definition = Some(type_definition.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn modelling_rule(mut self, rule: ModellingRule) -> Self {
        self.modelling_rule = Some(rule);
        self
    }

    pub fn containment(mut self, containment: Containment) -> Self {
        self.containment = Some(containment);
        self
    }
}

/// Lower-case the first character of `name`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A fully validated attachment, ready to apply.
#[derive(Debug, Clone, PartialEq)]
struct AttachmentPlan {
    parent: NodeId,
    reference_type: NodeId,
    descriptor: VariableDescriptor,
    field: Option<String>,
}

fn invalid(message: impl Into<String>) -> Isa95Error {
    Isa95Error::InvalidRequest(message.into())
}

fn plan(
    space: &AddressSpace,
    request: &AttachmentRequest,
    category: AttachmentCategory,
    config: &ExtensionConfig,
) -> Result<AttachmentPlan, Isa95Error> {
    let parent_id = request
        .parent
        .ok_or_else(|| invalid(format!("{category} attachment expects a parent node")))?;
    let parent = space
        .find_node(&parent_id)
        .ok_or_else(|| Isa95Error::not_found("node", parent_id.to_string()))?;
    // an empty browse name counts as missing
    let browse_name = request
        .browse_name
        .as_deref()
        .filter(|name| !name.is_empty());

    let (type_definition, data_type, modelling_rule) = match category.base_type() {
        Some(base_type) => {
            if let Some(containment) = request.containment {
                return Err(invalid(format!(
                    "{} cannot be combined with {category} attachment",
                    containment.option_name()
                )));
            }
            if category == AttachmentCategory::Property && browse_name.is_none() {
                return Err(invalid("property attachment expects a browse name"));
            }
            let data_type = request
                .data_type
                .as_ref()
                .ok_or_else(|| invalid(format!("{category} attachment expects a data type")))?;
            let type_ref = request.type_definition.as_ref().ok_or_else(|| {
                invalid(format!("{category} attachment expects a type definition"))
            })?;
            let type_definition = resolve_type(space, type_ref, base_type, config.subtype_policy)?;
            let data_type = resolve_data_type(space, data_type)?;
            // class properties never carry a modelling rule
            let modelling_rule = match category {
                AttachmentCategory::Property => request.modelling_rule,
                _ => None,
            };
            (type_definition, data_type, modelling_rule)
        }
        None => {
            if request.modelling_rule.is_none() && parent.is_type_definition() {
                return Err(Isa95Error::MissingModellingRule {
                    parent: parent.browse_name.to_string(),
                });
            }
            let data_type = request
                .data_type
                .as_ref()
                .ok_or_else(|| invalid(format!("{category} attachment expects a data type")))?;
            let data_type = resolve_data_type(space, data_type)?;
            let type_definition =
                resolve_attribute_type(space, request.type_definition.as_ref())?;
            (type_definition, data_type, request.modelling_rule)
        }
    };

    let browse_name = browse_name
        .map(str::to_string)
        .ok_or_else(|| invalid("a browse name is required to create a node"))?;

    let reference_name = category.reference_type();
    let reference_type = space
        .find_isa95_reference_type(reference_name)
        .ok_or_else(|| Isa95Error::not_found("reference type", reference_name))?
        .node_id;

    let field = match category {
        AttachmentCategory::Attribute => {
            let field = lower_first(&browse_name);
            if config.field_collision == FieldCollisionPolicy::Reject
                && parent.field(&field).is_some()
            {
                return Err(Isa95Error::FieldCollision {
                    parent: parent.browse_name.to_string(),
                    field,
                });
            }
            Some(field)
        }
        _ => None,
    };

    Ok(AttachmentPlan {
        parent: parent_id,
        reference_type,
        descriptor: VariableDescriptor {
            browse_name,
            type_definition,
            data_type,
            value: request.value.clone(),
            modelling_rule,
        },
        field,
    })
}

fn commit(space: &mut AddressSpace, plan: AttachmentPlan) -> Result<NodeId, Isa95Error> {
    let child = space.add_variable(plan.descriptor)?;
    space.add_reference(plan.parent, plan.reference_type, child)?;
    if let Some(field) = plan.field {
        if let Some(previous) = space.bind_field(plan.parent, field.as_str(), child)? {
            tracing::debug!(parent = %plan.parent, %field, %previous, "field rebound");
        }
    }
    Ok(child)
}

/// Run one attachment of `category`.
pub fn attach(
    space: &mut AddressSpace,
    category: AttachmentCategory,
    request: &AttachmentRequest,
    config: &ExtensionConfig,
) -> Result<NodeId, Isa95Error> {
    let plan = plan(space, request, category, config)?;
    let parent = plan.parent;
    let child = commit(space, plan)?;
    tracing::debug!(%category, %parent, %child, "attached");
    Ok(child)
}

/// Attach a class property (`HasISA95ClassProperty`) to an ISA-95 class.
pub fn add_class_property(
    space: &mut AddressSpace,
    request: &AttachmentRequest,
    config: &ExtensionConfig,
) -> Result<NodeId, Isa95Error> {
    attach(space, AttachmentCategory::ClassProperty, request, config)
}

/// Attach a property (`HasISA95Property`) to an ISA-95 object.
pub fn add_property(
    space: &mut AddressSpace,
    request: &AttachmentRequest,
    config: &ExtensionConfig,
) -> Result<NodeId, Isa95Error> {
    attach(space, AttachmentCategory::Property, request, config)
}

/// Attach an attribute (`HasISA95Attribute`) and bind it as a field of the parent.
pub fn add_attribute(
    space: &mut AddressSpace,
    request: &AttachmentRequest,
    config: &ExtensionConfig,
) -> Result<NodeId, Isa95Error> {
    attach(space, AttachmentCategory::Attribute, request, config)
}
