use crate::support::print_json;
use isa95_kernel::{EQUIPMENT_LEVEL_ENUM, EquipmentLevel};
use serde_json::json;

pub fn run(json_output: bool) {
    if json_output {
        let levels: Vec<_> = EquipmentLevel::ALL
            .iter()
            .map(|level| json!({ "name": level.name(), "value": level.value() }))
            .collect();
        print_json(&json!({
            "enumeration": EQUIPMENT_LEVEL_ENUM,
            "levels": levels,
        }));
    } else {
        println!("{EQUIPMENT_LEVEL_ENUM}");
        for level in EquipmentLevel::ALL {
            println!("  {:>2}  {}", level.value(), level.name());
        }
    }
}
