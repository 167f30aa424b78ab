use crate::support::{load_catalog_or_exit, print_json_or_exit};
use l3d_kernel::Catalog;
use serde_json::json;

pub fn run(catalog_path: String, json_output: bool) {
    let catalog = load_catalog_or_exit(Some(catalog_path.as_str()));
    let names = catalog.names();

    if json_output {
        print_json_or_exit(
            &json!({ "catalogPath": catalog_path, "names": names }),
            "catalog names",
        );
    } else {
        println!("l3d catalog");
        println!("  Path: {catalog_path}");
        println!("  Entries: {}", names.len());
        for name in &names {
            println!("  - {name}");
        }
    }
}
