use crate::cli::TypeKind;
use crate::support::{bootstrap_or_exit, print_json};
use isa95_kernel::{ExtensionConfig, ISA95_NAMESPACE_URI, isa95_types};
use isa95_space::{AddressSpace, Node};
use serde_json::{Value, json};

fn supertype_name(space: &AddressSpace, node: &Node) -> Option<String> {
    node.subtype_of
        .and_then(|id| space.find_node(&id))
        .map(|supertype| supertype.browse_name.to_string())
}

pub fn run(kind: Option<TypeKind>, json_output: bool) {
    let (space, _) = bootstrap_or_exit(ExtensionConfig::default());
    let kinds: Vec<TypeKind> = match kind {
        Some(kind) => vec![kind],
        None => TypeKind::ALL.to_vec(),
    };

    if json_output {
        let types: Vec<Value> = kinds
            .iter()
            .flat_map(|kind| isa95_types(&space, kind.node_class()))
            .map(|node| {
                json!({
                    "nodeId": node.node_id.to_string(),
                    "browseName": node.browse_name.name,
                    "nodeClass": node.node_class.as_str(),
                    "subtypeOf": supertype_name(&space, node),
                })
            })
            .collect();
        print_json(&json!({
            "namespaceUri": ISA95_NAMESPACE_URI,
            "count": types.len(),
            "types": types,
        }));
    } else {
        println!("isa95 types ({ISA95_NAMESPACE_URI})");
        for kind in kinds {
            let class = kind.node_class();
            let nodes = isa95_types(&space, class);
            println!("  {class} ({})", nodes.len());
            for node in nodes {
                match supertype_name(&space, node) {
                    Some(supertype) => println!(
                        "    {} {} <: {supertype}",
                        node.node_id, node.browse_name.name
                    ),
                    None => println!("    {} {}", node.node_id, node.browse_name.name),
                }
            }
        }
    }
}
