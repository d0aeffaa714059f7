//! Integration tests: the three attachment operations against a bootstrapped space.

use isa95_kernel::{
    AttachmentCategory, AttachmentRequest, Containment, ExtensionConfig, FieldCollisionPolicy,
    Isa95Error, Isa95Extension, Isa95Lookup, attach, bootstrap,
};
use isa95_space::{AddressSpace, BuiltinType, ModellingRule, NodeClass, NodeId, standard};

struct Fixture {
    space: AddressSpace,
    extension: Isa95Extension,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(ExtensionConfig::default())
    }

    fn with_config(config: ExtensionConfig) -> Self {
        let (space, extension) = bootstrap("urn:plant:own", config).expect("bootstrap");
        Self { space, extension }
    }

    fn isa95_object_type(&self, name: &str) -> NodeId {
        self.space
            .find_isa95_object_type(name)
            .unwrap_or_else(|| panic!("missing object type {name}"))
            .node_id
    }

    fn isa95_variable_type(&self, name: &str) -> NodeId {
        self.space
            .find_isa95_variable_type(name)
            .unwrap_or_else(|| panic!("missing variable type {name}"))
            .node_id
    }

    fn reference_type(&self, name: &str) -> NodeId {
        self.space
            .find_isa95_reference_type(name)
            .unwrap_or_else(|| panic!("missing reference type {name}"))
            .node_id
    }

    /// An equipment instance.
    fn equipment(&mut self, name: &str) -> NodeId {
        let equipment_type = self.isa95_object_type("EquipmentType");
        self.space.add_object(name, equipment_type).unwrap()
    }

    /// A new equipment class type, i.e. a type-definition parent.
    fn equipment_class(&mut self, name: &str) -> NodeId {
        let class_type = self.isa95_object_type("EquipmentClassType");
        self.space
            .add_type(NodeClass::ObjectType, name, class_type)
            .unwrap()
    }

    fn counts(&self) -> (usize, usize) {
        (self.space.node_count(), self.space.reference_count())
    }
}

// ── class properties ────────────────────────────────────────────────────

#[test]
fn class_property_is_linked_with_has_class_property() {
    let mut fx = Fixture::new();
    let class = fx.equipment_class("MixerClassType");
    let before = fx.counts();

    let request = AttachmentRequest::new(class, "MaxRpm")
        .data_type("Double")
        .type_definition("ISA95ClassPropertyType")
        .value(1200.0);
    let child = fx.extension.add_class_property(&mut fx.space, &request).unwrap();

    assert_eq!(fx.counts(), (before.0 + 1, before.1 + 1));
    let node = fx.space.find_node(&child).unwrap();
    assert_eq!(node.browse_name.name, "MaxRpm");
    assert_eq!(node.browse_name.namespace, fx.space.own_namespace());
    assert_eq!(
        node.type_definition,
        Some(fx.isa95_variable_type("ISA95ClassPropertyType"))
    );
    assert_eq!(node.data_type, Some(BuiltinType::Double.node_id()));
    assert_eq!(node.value, serde_json::json!(1200.0));
    assert_eq!(node.modelling_rule, None);

    let links: Vec<_> = fx.space.references_from(class).collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, child);
    assert_eq!(links[0].reference_type, fx.reference_type("HasISA95ClassProperty"));
}

#[test]
fn class_property_rejects_generic_containment() {
    let mut fx = Fixture::new();
    let class = fx.equipment_class("MixerClassType");
    let before = fx.counts();

    for containment in [
        Containment::ComponentOf(class),
        Containment::OrganizedBy(class),
        Containment::PropertyOf(class),
    ] {
        let request = AttachmentRequest::new(class, "MaxRpm")
            .data_type("Double")
            .type_definition("ISA95ClassPropertyType")
            .containment(containment);
        let err = fx
            .extension
            .add_class_property(&mut fx.space, &request)
            .unwrap_err();
        assert!(matches!(err, Isa95Error::InvalidRequest(_)), "{err}");
    }
    assert_eq!(fx.counts(), before);
}

#[test]
fn class_property_requires_data_type_and_type_definition() {
    let mut fx = Fixture::new();
    let class = fx.equipment_class("MixerClassType");

    let no_data_type =
        AttachmentRequest::new(class, "MaxRpm").type_definition("ISA95ClassPropertyType");
    assert!(matches!(
        fx.extension.add_class_property(&mut fx.space, &no_data_type),
        Err(Isa95Error::InvalidRequest(_))
    ));

    let no_type = AttachmentRequest::new(class, "MaxRpm").data_type("Double");
    assert!(matches!(
        fx.extension.add_class_property(&mut fx.space, &no_type),
        Err(Isa95Error::InvalidRequest(_))
    ));

    let no_parent = AttachmentRequest {
        parent: None,
        ..AttachmentRequest::new(class, "MaxRpm")
            .data_type("Double")
            .type_definition("ISA95ClassPropertyType")
    };
    assert!(matches!(
        fx.extension.add_class_property(&mut fx.space, &no_parent),
        Err(Isa95Error::InvalidRequest(_))
    ));
}

// ── properties ──────────────────────────────────────────────────────────

#[test]
fn property_carries_modelling_rule_through() {
    let mut fx = Fixture::new();
    let class = fx.equipment_class("PumpClassType");

    let request = AttachmentRequest::new(class, "FlowRate")
        .data_type("Float")
        .type_definition("ISA95PropertyType")
        .modelling_rule(ModellingRule::Optional);
    let child = fx.extension.add_property(&mut fx.space, &request).unwrap();

    let node = fx.space.find_node(&child).unwrap();
    assert_eq!(node.modelling_rule, Some(ModellingRule::Optional));
    let link = fx.space.references_to(child).next().unwrap();
    assert_eq!(link.source, class);
    assert_eq!(link.reference_type, fx.reference_type("HasISA95Property"));
}

#[test]
fn property_requires_browse_name() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");
    let before = fx.counts();

    let request = AttachmentRequest {
        browse_name: None,
        ..AttachmentRequest::new(pump, "unused")
            .data_type("Float")
            .type_definition("ISA95PropertyType")
    };
    let err = fx.extension.add_property(&mut fx.space, &request).unwrap_err();
    assert!(err.to_string().contains("browse name"), "{err}");
    assert_eq!(fx.counts(), before);
}

#[test]
fn subtype_of_base_type_is_accepted() {
    let mut fx = Fixture::new();
    let base = fx.isa95_variable_type("ISA95PropertyType");
    let derived = fx
        .space
        .add_type(NodeClass::VariableType, "TemperaturePropertyType", base)
        .unwrap();
    let pump = fx.equipment("Pump1");

    let request = AttachmentRequest::new(pump, "Temperature")
        .data_type("Double")
        .type_definition(derived);
    let child = fx.extension.add_property(&mut fx.space, &request).unwrap();
    assert_eq!(
        fx.space.find_node(&child).unwrap().type_definition,
        Some(derived)
    );
}

#[test]
fn foreign_type_definition_is_a_strict_violation() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");
    let before = fx.counts();

    let request = AttachmentRequest::new(pump, "Temperature")
        .data_type("Double")
        .type_definition("ISA95ClassPropertyType");
    let err = fx.extension.add_property(&mut fx.space, &request).unwrap_err();
    assert!(matches!(err, Isa95Error::SubtypeViolation { .. }), "{err}");
    assert_eq!(fx.counts(), before);
}

#[test]
fn foreign_type_definition_is_accepted_when_lenient() {
    let mut fx = Fixture::with_config(ExtensionConfig::lenient());
    let pump = fx.equipment("Pump1");
    let before = fx.counts();

    let request = AttachmentRequest::new(pump, "Temperature")
        .data_type("Double")
        .type_definition("ISA95ClassPropertyType");
    let child = fx.extension.add_property(&mut fx.space, &request).unwrap();
    assert_eq!(fx.counts(), (before.0 + 1, before.1 + 1));
    assert_eq!(
        fx.space.find_node(&child).unwrap().type_definition,
        Some(fx.isa95_variable_type("ISA95ClassPropertyType"))
    );
}

#[test]
fn unknown_type_definition_is_not_found() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");
    let before = fx.counts();

    let request = AttachmentRequest::new(pump, "Temperature")
        .data_type("Double")
        .type_definition("ISA95NoSuchType");
    let err = fx.extension.add_property(&mut fx.space, &request).unwrap_err();
    assert!(matches!(err, Isa95Error::NotFound { .. }));
    assert_eq!(fx.counts(), before);
}

#[test]
fn resolution_path_does_not_change_the_type() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");
    let type_id = fx.isa95_variable_type("ISA95PropertyType");
    let handle = fx.space.find_node(&type_id).unwrap().clone();

    let by_name = AttachmentRequest::new(pump, "A")
        .data_type("Double")
        .type_definition("ISA95PropertyType");
    let by_id = AttachmentRequest::new(pump, "B")
        .data_type("Double")
        .type_definition(type_id);
    let by_node = AttachmentRequest::new(pump, "C")
        .data_type("Double")
        .type_definition(&handle);

    let types: Vec<_> = [by_name, by_id, by_node]
        .iter()
        .map(|request| {
            let child = fx.extension.add_property(&mut fx.space, request).unwrap();
            fx.space.find_node(&child).unwrap().type_definition
        })
        .collect();
    assert_eq!(types, vec![Some(type_id); 3]);
}

#[test]
fn identical_requests_create_distinct_children() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");
    let request = AttachmentRequest::new(pump, "FlowRate")
        .data_type("Float")
        .type_definition("ISA95PropertyType");

    let first = fx.extension.add_property(&mut fx.space, &request).unwrap();
    let second = fx.extension.add_property(&mut fx.space, &request).unwrap();
    assert_ne!(first, second);
    assert_eq!(fx.space.references_from(pump).count(), 2);
}

// ── attributes ──────────────────────────────────────────────────────────

#[test]
fn attribute_on_instance_defaults_its_type() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");
    let before = fx.counts();

    let request = AttachmentRequest::new(pump, "Speed").data_type("Int32").value(42);
    let child = fx.extension.add_attribute(&mut fx.space, &request).unwrap();

    assert_eq!(fx.counts(), (before.0 + 1, before.1 + 1));
    let node = fx.space.find_node(&child).unwrap();
    assert_eq!(node.type_definition, Some(standard::BASE_DATA_VARIABLE_TYPE));
    assert_eq!(node.data_type, Some(BuiltinType::Int32.node_id()));
    let link = fx.space.references_to(child).next().unwrap();
    assert_eq!(link.reference_type, fx.reference_type("HasISA95Attribute"));
    assert_eq!(fx.space.field(&pump, "speed"), Some(child));
}

#[test]
fn attribute_on_type_definition_needs_a_modelling_rule() {
    let mut fx = Fixture::new();
    let class = fx.equipment_class("PumpClassType");
    let before = fx.counts();

    let request = AttachmentRequest::new(class, "Speed").data_type("Int32");
    let err = fx.extension.add_attribute(&mut fx.space, &request).unwrap_err();
    assert!(matches!(err, Isa95Error::MissingModellingRule { .. }), "{err}");
    assert_eq!(fx.counts(), before);
    assert_eq!(fx.space.field(&class, "speed"), None);

    let request = request.modelling_rule(ModellingRule::Mandatory);
    let child = fx.extension.add_attribute(&mut fx.space, &request).unwrap();
    assert_eq!(
        fx.space.find_node(&child).unwrap().modelling_rule,
        Some(ModellingRule::Mandatory)
    );
}

#[test]
fn attribute_data_type_falls_back_to_scalars() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");

    let level = AttachmentRequest::new(pump, "Level").data_type("ISA95EquipmentElementLevelEnum");
    let child = fx.extension.add_attribute(&mut fx.space, &level).unwrap();
    assert_eq!(
        fx.space.find_node(&child).unwrap().data_type,
        fx.space
            .find_isa95_data_type("ISA95EquipmentElementLevelEnum")
            .map(|node| node.node_id)
    );

    let id = AttachmentRequest::new(pump, "Identifier").data_type("CDTIdentifier");
    let child = fx.extension.add_attribute(&mut fx.space, &id).unwrap();
    assert_eq!(
        fx.space.find_node(&child).unwrap().data_type,
        Some(BuiltinType::String.node_id())
    );
}

#[test]
fn attribute_with_unknown_data_type_fails_cleanly() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");
    let before = fx.counts();

    let request = AttachmentRequest::new(pump, "Speed").data_type("Warp");
    let err = fx.extension.add_attribute(&mut fx.space, &request).unwrap_err();
    assert_eq!(err.to_string(), "cannot find dataType Warp");
    assert_eq!(fx.counts(), before);
}

#[test]
fn attribute_field_collision_is_last_write_wins() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");

    let upper = AttachmentRequest::new(pump, "Speed").data_type("Int32");
    let lower = AttachmentRequest::new(pump, "speed").data_type("Int32");
    let first = fx.extension.add_attribute(&mut fx.space, &upper).unwrap();
    let second = fx.extension.add_attribute(&mut fx.space, &lower).unwrap();

    assert_ne!(first, second);
    assert_eq!(fx.space.field(&pump, "speed"), Some(second));
    // both children stay attached
    assert_eq!(fx.space.references_from(pump).count(), 2);
}

#[test]
fn attribute_field_collision_can_be_rejected() {
    let config = ExtensionConfig {
        field_collision: FieldCollisionPolicy::Reject,
        ..ExtensionConfig::default()
    };
    let mut fx = Fixture::with_config(config);
    let pump = fx.equipment("Pump1");

    let upper = AttachmentRequest::new(pump, "Speed").data_type("Int32");
    let first = fx.extension.add_attribute(&mut fx.space, &upper).unwrap();
    let before = fx.counts();

    let lower = AttachmentRequest::new(pump, "speed").data_type("Int32");
    let err = fx.extension.add_attribute(&mut fx.space, &lower).unwrap_err();
    assert!(matches!(err, Isa95Error::FieldCollision { .. }), "{err}");
    assert_eq!(fx.counts(), before);
    assert_eq!(fx.space.field(&pump, "speed"), Some(first));
}

#[test]
fn attribute_accepts_explicit_type_definition() {
    let mut fx = Fixture::new();
    let pump = fx.equipment("Pump1");

    let request = AttachmentRequest::new(pump, "Serial")
        .data_type("String")
        .type_definition("PropertyType");
    let child = fx.extension.add_attribute(&mut fx.space, &request).unwrap();
    assert_eq!(
        fx.space.find_node(&child).unwrap().type_definition,
        Some(standard::PROPERTY_TYPE)
    );
}

#[test]
fn unknown_parent_is_not_found() {
    let mut fx = Fixture::new();
    let before = fx.counts();
    let request = AttachmentRequest::new(NodeId::new(1, 999_999), "Speed").data_type("Int32");
    let err = fx.extension.add_attribute(&mut fx.space, &request).unwrap_err();
    assert!(matches!(err, Isa95Error::NotFound { what: "node", .. }));
    assert_eq!(fx.counts(), before);
}

#[test]
fn empty_browse_name_counts_as_missing() {
    let mut fx = Fixture::new();
    let class = fx.equipment_class("PumpClassType");
    let pump = fx.equipment("Pump1");
    let before = fx.counts();

    let class_property = AttachmentRequest::new(class, "")
        .data_type("Double")
        .type_definition("ISA95ClassPropertyType");
    let property = AttachmentRequest::new(pump, "")
        .data_type("Double")
        .type_definition("ISA95PropertyType");
    let attribute = AttachmentRequest::new(pump, "").data_type("Int32");

    for (category, request) in [
        (AttachmentCategory::ClassProperty, &class_property),
        (AttachmentCategory::Property, &property),
        (AttachmentCategory::Attribute, &attribute),
    ] {
        let err = fx.extension.attach(&mut fx.space, category, request).unwrap_err();
        assert!(matches!(err, Isa95Error::InvalidRequest(_)), "{category}: {err}");
    }
    assert_eq!(fx.counts(), before);
    assert_eq!(fx.space.field(&pump, ""), None);
}

#[test]
fn transitive_subtype_of_base_type_is_accepted() {
    let mut fx = Fixture::new();
    let base = fx.isa95_variable_type("ISA95PropertyType");
    let mid = fx
        .space
        .add_type(NodeClass::VariableType, "ProcessPropertyType", base)
        .unwrap();
    let leaf = fx
        .space
        .add_type(NodeClass::VariableType, "FlowPropertyType", mid)
        .unwrap();
    let pump = fx.equipment("Pump1");

    let request = AttachmentRequest::new(pump, "Flow")
        .data_type("Double")
        .type_definition(leaf);
    let child = fx.extension.add_property(&mut fx.space, &request).unwrap();
    assert_eq!(fx.space.find_node(&child).unwrap().type_definition, Some(leaf));

    // the same chain hangs below the wrong base for class properties
    let before = fx.counts();
    let request = AttachmentRequest::new(pump, "Flow")
        .data_type("Double")
        .type_definition(leaf);
    let err = fx
        .extension
        .add_class_property(&mut fx.space, &request)
        .unwrap_err();
    assert!(matches!(err, Isa95Error::SubtypeViolation { .. }), "{err}");
    assert_eq!(fx.counts(), before);
}

#[test]
fn modelling_rule_guard_covers_every_type_class() {
    let mut fx = Fixture::new();
    let property_type = fx.isa95_variable_type("ISA95PropertyType");
    let variable_type = fx
        .space
        .add_type(NodeClass::VariableType, "GaugePropertyType", property_type)
        .unwrap();
    let data_type = fx
        .space
        .add_type(NodeClass::DataType, "RpmType", BuiltinType::Int32.node_id())
        .unwrap();

    for parent in [variable_type, data_type] {
        let before = fx.counts();
        let request = AttachmentRequest::new(parent, "Speed").data_type("Int32");
        let err = fx.extension.add_attribute(&mut fx.space, &request).unwrap_err();
        assert!(matches!(err, Isa95Error::MissingModellingRule { .. }), "{err}");
        assert_eq!(fx.counts(), before);

        let request = request.modelling_rule(ModellingRule::Optional);
        fx.extension.add_attribute(&mut fx.space, &request).unwrap();
        assert_eq!(fx.counts(), (before.0 + 1, before.1 + 1));
    }
}

#[test]
fn attaching_without_the_extension_is_not_found() {
    let mut space = AddressSpace::with_standard_nodes("urn:plant:bare").unwrap();
    let pump = space.add_object("Pump1", standard::BASE_OBJECT_TYPE).unwrap();
    let config = ExtensionConfig::default();
    let before = (space.node_count(), space.reference_count());

    let class_property = AttachmentRequest::new(pump, "MaxRpm")
        .data_type("Double")
        .type_definition("ISA95ClassPropertyType");
    let property = AttachmentRequest::new(pump, "FlowRate")
        .data_type("Double")
        .type_definition("ISA95PropertyType");
    let attribute = AttachmentRequest::new(pump, "Speed").data_type("Int32");

    for (category, request) in [
        (AttachmentCategory::ClassProperty, &class_property),
        (AttachmentCategory::Property, &property),
        (AttachmentCategory::Attribute, &attribute),
    ] {
        let err = attach(&mut space, category, request, &config).unwrap_err();
        assert!(matches!(err, Isa95Error::NotFound { .. }), "{category}: {err}");
    }
    assert_eq!((space.node_count(), space.reference_count()), before);
    assert_eq!(space.field(&pump, "speed"), None);
}
