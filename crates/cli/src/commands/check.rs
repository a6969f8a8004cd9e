use std::path::Path;
use std::process;

use formwright_core::check_integrity;

use crate::input::read_form;
use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_check(form_path: &Path, output: OutputFormat, quiet: bool) {
    let fields = match read_form(form_path) {
        Ok(f) => f,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let errors: Vec<String> = match check_integrity(&fields) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };
    // A parent with no formula yet is legal but never produces a value.
    let warnings: Vec<String> = fields
        .iter()
        .filter(|f| f.is_derived() && f.formula.trim().is_empty())
        .map(|f| format!("field '{}' has a parent but no formula", f.id))
        .collect();

    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "fields": fields.len(),
            "errors": errors,
            "warnings": warnings,
        })),
        OutputFormat::Text => {
            if !quiet {
                for w in &warnings {
                    eprintln!("warning: {}", w);
                }
            }
            if errors.is_empty() {
                if !quiet {
                    println!("ok: {} field(s)", fields.len());
                }
            } else if !quiet {
                eprintln!("invalid form");
                for e in &errors {
                    eprintln!("  - {}", e);
                }
            }
        }
    }

    if !errors.is_empty() {
        process::exit(1);
    }
}
