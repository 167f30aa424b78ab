use crate::support::{fail, load_catalog_or_exit, print_json_or_exit};
use l3d_kernel::resolve;

pub fn run(name: String, catalog_path: String) {
    let catalog = load_catalog_or_exit(Some(catalog_path.as_str()));
    let definition = resolve(&catalog, &name).unwrap_or_else(|e| fail("resolve failed", e));
    print_json_or_exit(definition, "catalog entry");
}
