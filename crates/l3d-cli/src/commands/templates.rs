use crate::support::{fail, print_json_or_exit};
use l3d_kernel::TemplateRegistry;
use serde_json::json;

pub fn run(type_name: Option<String>, json_output: bool) {
    let registry = TemplateRegistry::builtin();

    let Some(type_name) = type_name else {
        let names = registry.template_names();
        if json_output {
            print_json_or_exit(&json!({ "templates": names }), "template names");
        } else {
            println!("l3d templates");
            for name in &names {
                println!("  {name}");
            }
        }
        return;
    };

    let template = registry
        .template_for(&type_name)
        .unwrap_or_else(|e| fail("template lookup failed", e));
    if json_output {
        print_json_or_exit(&template.to_value(), "template");
    } else {
        println!("l3d template {}", template.type_name());
        for (field, default) in template.fields() {
            println!("  {field}: {default}");
        }
    }
}
