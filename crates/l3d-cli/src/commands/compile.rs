use crate::support::{fail, load_catalog_or_exit, print_json_or_exit, read_json_file_or_exit};
use l3d_kernel::{Engine, TemplateRegistry};
use serde_json::Value;

pub fn run(document_path: String, catalog_path: Option<String>, sanitize_first: bool) {
    let document: Value = read_json_file_or_exit(&document_path, "definition");
    let catalog = load_catalog_or_exit(catalog_path.as_deref());
    let registry = TemplateRegistry::builtin();
    let engine = Engine::new(&registry, &catalog);

    let compiled = if sanitize_first {
        engine
            .prepare(&document)
            .unwrap_or_else(|e| fail("compile failed", e))
    } else {
        engine
            .compile(&document)
            .unwrap_or_else(|e| fail("compile failed", e))
    };
    log::debug!("compiled {document_path} into a {} tree", compiled.type_name());
    print_json_or_exit(&compiled, "compiled definition");
}
