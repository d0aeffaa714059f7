use crate::support::{bootstrap_or_exit, exit_with, load_config_or_exit, parse_or_exit, print_json};
use isa95_kernel::{
    AttachmentCategory, AttachmentRequest, Isa95Lookup, TypeRef, lower_first,
};
use isa95_space::{AddressSpace, ModellingRule, NodeClass, NodeId};
use serde_json::{Value, json};

/// Instance parent used when no `--parent-type` is given.
const DEMO_INSTANCE: &str = "Equipment1";

pub struct Args {
    pub config: Option<String>,
    pub category: String,
    pub browse_name: String,
    pub data_type: String,
    pub type_definition: Option<String>,
    pub value: Option<String>,
    pub modelling_rule: Option<String>,
    pub parent_type: Option<String>,
    pub subtype_policy: Option<String>,
    pub field_collision: Option<String>,
    pub json: bool,
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_type_ref(raw: &str) -> TypeRef {
    match raw.parse::<NodeId>() {
        Ok(id) => TypeRef::Id(id),
        Err(_) => TypeRef::Name(raw.to_string()),
    }
}

fn isa95_object_type_or_exit(space: &AddressSpace, name: &str) -> NodeId {
    space
        .find_isa95_object_type(name)
        .map(|node| node.node_id)
        .unwrap_or_else(|| exit_with(format!("cannot find object type {name}")))
}

/// An `EquipmentType` instance, or a new subtype of `EquipmentClassType`.
fn create_parent(space: &mut AddressSpace, parent_type: Option<&str>) -> NodeId {
    let created = match parent_type {
        Some(name) => {
            let class_type = isa95_object_type_or_exit(space, "EquipmentClassType");
            space.add_type(NodeClass::ObjectType, name, class_type)
        }
        None => {
            let equipment_type = isa95_object_type_or_exit(space, "EquipmentType");
            space.add_object(DEMO_INSTANCE, equipment_type)
        }
    };
    created.unwrap_or_else(|e| exit_with(e))
}

fn display_name(space: &AddressSpace, id: Option<NodeId>) -> Option<String> {
    id.and_then(|id| space.find_node(&id))
        .map(|node| node.browse_name.to_string())
}

pub fn run(args: Args) {
    let category: AttachmentCategory = parse_or_exit(&args.category);
    let mut config = load_config_or_exit(args.config.as_deref());
    if let Some(policy) = args.subtype_policy.as_deref() {
        config.subtype_policy = parse_or_exit(policy);
    }
    if let Some(policy) = args.field_collision.as_deref() {
        config.field_collision = parse_or_exit(policy);
    }

    let (mut space, extension) = bootstrap_or_exit(config);
    let parent = create_parent(&mut space, args.parent_type.as_deref());

    let mut request =
        AttachmentRequest::new(parent, args.browse_name.clone()).data_type(args.data_type.clone());
    if let Some(raw) = args.type_definition.as_deref() {
        request = request.type_definition(parse_type_ref(raw));
    }
    if let Some(raw) = args.value.as_deref() {
        request = request.value(parse_value(raw));
    }
    if let Some(raw) = args.modelling_rule.as_deref() {
        request = request.modelling_rule(parse_or_exit::<ModellingRule>(raw));
    }

    let child = extension
        .attach(&mut space, category, &request)
        .unwrap_or_else(|e| exit_with(e));

    let Some(parent_node) = space.find_node(&parent) else {
        exit_with(format!("cannot find node {parent}"));
    };
    let Some(child_node) = space.find_node(&child) else {
        exit_with(format!("cannot find node {child}"));
    };
    let reference_type = space
        .references_to(child)
        .next()
        .map(|reference| reference.reference_type);
    let field = match category {
        AttachmentCategory::Attribute => Some(lower_first(&args.browse_name)),
        _ => None,
    };

    if args.json {
        print_json(&json!({
            "category": category.as_str(),
            "parent": {
                "nodeId": parent.to_string(),
                "browseName": parent_node.browse_name.to_string(),
                "kind": parent_node.kind(),
            },
            "node": {
                "nodeId": child.to_string(),
                "browseName": child_node.browse_name.to_string(),
                "typeDefinition": display_name(&space, child_node.type_definition),
                "dataType": display_name(&space, child_node.data_type)
                    .or_else(|| child_node.data_type.map(|id| id.to_string())),
                "value": child_node.value,
                "modellingRule": child_node.modelling_rule.map(ModellingRule::as_str),
            },
            "referenceType": display_name(&space, reference_type),
            "field": field,
        }));
    } else {
        println!("isa95 attach {category} {}", args.browse_name);
        println!("  Parent: {} ({})", parent_node.browse_name, parent);
        println!("  Node: {} ({})", child_node.browse_name, child);
        if let Some(name) = display_name(&space, child_node.type_definition) {
            println!("  Type definition: {name}");
        }
        if let Some(name) = display_name(&space, child_node.data_type) {
            println!("  Data type: {name}");
        }
        if let Some(rule) = child_node.modelling_rule {
            println!("  Modelling rule: {rule}");
        }
        if let Some(name) = display_name(&space, reference_type) {
            println!("  Reference: {name}");
        }
        if let Some(field) = field {
            println!("  Field: {field}");
        }
    }
}
