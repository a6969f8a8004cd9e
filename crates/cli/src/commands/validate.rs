use std::path::Path;
use std::process;

use formwright_eval::validate_form;

use crate::input::{load_form, load_values};
use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_validate(form_path: &Path, values_path: &Path, output: OutputFormat, quiet: bool) {
    let fields = match load_form(form_path) {
        Ok(f) => f,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let values = match load_values(values_path, &fields) {
        Ok(v) => v,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let result = validate_form(&fields, &values);
    match output {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Text => {
            if !quiet {
                if result.has_errors {
                    // Field order reads better than id order.
                    for field in &fields {
                        let Some(messages) = result.errors.get(&field.id) else {
                            continue;
                        };
                        for m in messages {
                            eprintln!("{}: {}", field.id, m);
                        }
                    }
                } else {
                    println!("valid");
                }
            }
        }
    }
    if result.has_errors {
        process::exit(1);
    }
}
