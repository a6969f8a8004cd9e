use std::process;

use formwright_core::{validate_formula, FieldType};

use crate::{print_json, OutputFormat};

pub(crate) fn cmd_formula(formula: &str, parent_type: FieldType, output: OutputFormat, quiet: bool) {
    let result = validate_formula(formula, parent_type);
    match output {
        OutputFormat::Json => match &result {
            Ok(()) => print_json(&serde_json::json!({ "valid": true })),
            Err(e) => print_json(&serde_json::json!({
                "valid": false,
                "error": e.to_string(),
            })),
        },
        OutputFormat::Text => {
            if !quiet {
                match &result {
                    Ok(()) => println!("ok"),
                    Err(e) => eprintln!("invalid formula: {}", e),
                }
            }
        }
    }
    if result.is_err() {
        process::exit(1);
    }
}
