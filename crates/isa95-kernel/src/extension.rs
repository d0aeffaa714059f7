//! Installing the ISA-95 extension into an address space.
//!
//! Installation is recorded in the space's own extension registry, so it is
//! idempotent per space: installing twice is a no-op that hands back a
//! working extension handle.

use crate::attach::{self, AttachmentCategory, AttachmentRequest};
use crate::config::ExtensionConfig;
use crate::equipment_level::{EQUIPMENT_LEVEL_ENUM, EquipmentLevel};
use crate::error::Isa95Error;
use crate::namespace::{ISA95_NAMESPACE_URI, Isa95Lookup};
use isa95_space::{AddressSpace, BuiltinType, HostVersion, NodeId, NodeSetDocument};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EXTENSION_NAME: &str = "ISA95";

/// Oldest host this extension works with.
pub const MIN_HOST_VERSION: HostVersion = HostVersion::new(0, 5, 1);

/// Newest host this extension was tested against.
pub const TESTED_HOST_VERSION: HostVersion = HostVersion::new(0, 5, 1);

/// The bundled ISA-95 node-set document.
pub const ISA95_NODESET: &str = include_str!("../nodesets/isa95.nodeset.json");

/// Opaque identifier scalar, carried as a string.
pub const CDT_IDENTIFIER: &str = "CDTIdentifier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
}

/// Handle to the ISA-95 extension of one space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isa95Extension {
    config: ExtensionConfig,
    namespace: u16,
    outcome: InstallOutcome,
}

/// Install the extension into `space`.
///
/// Fails with `IncompatibleHost` when the host is older than
/// [`MIN_HOST_VERSION`]; a host newer than [`TESTED_HOST_VERSION`] is
/// accepted with a warning. The space needs the standard base types.
pub fn install(
    space: &mut AddressSpace,
    config: ExtensionConfig,
) -> Result<Isa95Extension, Isa95Error> {
    if space.extensions().is_installed(EXTENSION_NAME) {
        let namespace = space
            .isa95_namespace()
            .ok_or_else(|| Isa95Error::not_found("namespace", ISA95_NAMESPACE_URI))?;
        return Ok(Isa95Extension {
            config,
            namespace,
            outcome: InstallOutcome::AlreadyInstalled,
        });
    }

    let host = space.host_version();
    if host < MIN_HOST_VERSION {
        return Err(Isa95Error::IncompatibleHost {
            actual: host,
            minimum: MIN_HOST_VERSION,
        });
    }
    if host > TESTED_HOST_VERSION {
        tracing::warn!(
            %host,
            tested = %TESTED_HOST_VERSION,
            "host is newer than the version this extension was tested against"
        );
    }

    let document = NodeSetDocument::from_json_str(ISA95_NODESET)?;
    let summary = space.load_nodeset(&document)?;

    space
        .scalars_mut()
        .register(CDT_IDENTIFIER, BuiltinType::String, Value::Null);
    space.register_enumeration(EQUIPMENT_LEVEL_ENUM, EquipmentLevel::enum_fields());
    space
        .extensions_mut()
        .record(EXTENSION_NAME, summary.version.clone());

    tracing::info!(
        namespace = summary.namespace_index,
        version = %summary.version,
        nodes = summary.node_count,
        "ISA-95 extension installed"
    );
    Ok(Isa95Extension {
        config,
        namespace: summary.namespace_index,
        outcome: InstallOutcome::Installed,
    })
}

/// A space with the standard base types and the ISA-95 extension installed.
pub fn bootstrap(
    own_namespace_uri: &str,
    config: ExtensionConfig,
) -> Result<(AddressSpace, Isa95Extension), Isa95Error> {
    let mut space = AddressSpace::with_standard_nodes(own_namespace_uri)?;
    let extension = install(&mut space, config)?;
    Ok((space, extension))
}

impl Isa95Extension {
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Index of the ISA-95 namespace in the space this handle was installed into.
    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    pub fn outcome(&self) -> InstallOutcome {
        self.outcome
    }

    pub fn attach(
        &self,
        space: &mut AddressSpace,
        category: AttachmentCategory,
        request: &AttachmentRequest,
    ) -> Result<NodeId, Isa95Error> {
        attach::attach(space, category, request, &self.config)
    }

    pub fn add_class_property(
        &self,
        space: &mut AddressSpace,
        request: &AttachmentRequest,
    ) -> Result<NodeId, Isa95Error> {
        attach::add_class_property(space, request, &self.config)
    }

    pub fn add_property(
        &self,
        space: &mut AddressSpace,
        request: &AttachmentRequest,
    ) -> Result<NodeId, Isa95Error> {
        attach::add_property(space, request, &self.config)
    }

    pub fn add_attribute(
        &self,
        space: &mut AddressSpace,
        request: &AttachmentRequest,
    ) -> Result<NodeId, Isa95Error> {
        attach::add_attribute(space, request, &self.config)
    }
}
