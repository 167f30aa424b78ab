use crate::support::{fail, print_json_or_exit, read_json_file_or_exit};
use l3d_kernel::{Sanitizer, TemplateRegistry};
use serde_json::Value;

pub fn run(document_path: String) {
    let document: Value = read_json_file_or_exit(&document_path, "definition");
    let registry = TemplateRegistry::builtin();
    let sanitized = Sanitizer::new(&registry)
        .sanitize(&document)
        .unwrap_or_else(|e| fail("sanitize failed", e));
    print_json_or_exit(&sanitized, "sanitized definition");
}
