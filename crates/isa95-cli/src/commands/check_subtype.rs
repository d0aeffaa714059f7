use crate::support::{bootstrap_or_exit, exit_with, print_json};
use isa95_kernel::{ExtensionConfig, Isa95Lookup};
use isa95_space::{AddressSpace, NodeId};
use serde_json::json;

fn variable_type_or_exit(space: &AddressSpace, name: &str) -> NodeId {
    space
        .find_isa95_variable_type(name)
        .map(|node| node.node_id)
        .unwrap_or_else(|| exit_with(format!("cannot find variable type {name}")))
}

pub fn run(candidate: String, base: String, json_output: bool) {
    let (space, _) = bootstrap_or_exit(ExtensionConfig::default());
    let candidate_id = variable_type_or_exit(&space, &candidate);
    let base_id = variable_type_or_exit(&space, &base);
    let compliant = space.is_supertype_of(&base_id, &candidate_id);

    if json_output {
        print_json(&json!({
            "candidate": candidate,
            "candidateId": candidate_id.to_string(),
            "base": base,
            "baseId": base_id.to_string(),
            "compliant": compliant,
        }));
    } else {
        println!("isa95 check-subtype {candidate} --base {base}");
        println!("  Compliant: {}", if compliant { "yes" } else { "no" });
    }
}
