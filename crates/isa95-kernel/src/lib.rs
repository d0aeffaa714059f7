//! # ISA-95 kernel
//!
//! The ISA-95 metamodel over an [`isa95_space::AddressSpace`]: typed
//! attachment of class-properties, properties and attributes to existing
//! nodes.
//!
//! ## Architecture
//!
//! ```text
//! install / bootstrap   ← node set, CDTIdentifier scalar, level enumeration
//!     │
//! attach                ← plan (validate, resolve) then commit (node + reference)
//!     │
//! resolve               ← TypeRef / DataTypeRef → NodeId, subtype policy
//!     │
//! namespace             ← Isa95Lookup: finders scoped to the ISA-95 namespace
//! ```
//!
//! | category       | base type                | reference               |
//! |----------------|--------------------------|-------------------------|
//! | class-property | `ISA95ClassPropertyType` | `HasISA95ClassProperty` |
//! | property       | `ISA95PropertyType`      | `HasISA95Property`      |
//! | attribute      | (none)                   | `HasISA95Attribute`     |

pub mod attach;
pub mod config;
pub mod equipment_level;
pub mod error;
pub mod extension;
pub mod namespace;
pub mod resolve;

pub use attach::{
    AttachmentCategory, AttachmentRequest, Containment, add_attribute, add_class_property,
    add_property, attach, lower_first,
};
pub use config::{ExtensionConfig, FieldCollisionPolicy, SubtypePolicy};
pub use equipment_level::{EQUIPMENT_LEVEL_ENUM, EquipmentLevel};
pub use error::Isa95Error;
pub use extension::{
    CDT_IDENTIFIER, EXTENSION_NAME, ISA95_NODESET, InstallOutcome, Isa95Extension,
    MIN_HOST_VERSION, TESTED_HOST_VERSION, bootstrap, install,
};
pub use namespace::{ISA95_NAMESPACE_URI, Isa95Lookup, isa95_types};
pub use resolve::{
    DataTypeRef, NodeHandle, TypeRef, resolve_attribute_type, resolve_data_type, resolve_type,
};
