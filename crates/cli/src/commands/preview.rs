use std::path::Path;
use std::process;

use formwright_core::{initial_values, FieldDefinition, FormValues};
use formwright_eval::dates::parse_date;
use formwright_eval::Resolver;

use crate::input::{load_form, load_values};
use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_init_values(form_path: &Path, output: OutputFormat, quiet: bool) {
    let fields = match load_form(form_path) {
        Ok(f) => f,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    print_values(&fields, &initial_values(&fields), output);
}

pub(crate) fn cmd_resolve(
    form_path: &Path,
    values_path: &Path,
    today: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let resolver = match today {
        None => Resolver::today_utc(),
        Some(s) => match parse_date(s) {
            Some(d) => Resolver::new(d),
            None => {
                let msg = format!("invalid date '{}': expected YYYY-MM-DD", s);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        },
    };
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

    let resolution = match resolver.resolve_to_fixed_point(&fields, &values) {
        Ok(r) => r,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => {
            let problems: Vec<serde_json::Value> = resolution
                .problems
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "fieldId": p.field_id,
                        "formula": p.formula,
                        "error": p.error.to_string(),
                    })
                })
                .collect();
            print_json(&serde_json::json!({
                "values": resolution.values,
                "changed": resolution.changed,
                "updated": resolution.updated,
                "problems": problems,
            }));
        }
        OutputFormat::Text => {
            print_values(&fields, &resolution.values, output);
            if !quiet {
                for p in &resolution.problems {
                    eprintln!("warning: field '{}' ({}): {}", p.field_id, p.formula, p.error);
                }
            }
        }
    }
}

/// Values in field order as `id = value` lines, or a JSON object.
fn print_values(fields: &[FieldDefinition], values: &FormValues, output: OutputFormat) {
    match output {
        OutputFormat::Json => print_json(values),
        OutputFormat::Text => {
            for field in fields {
                if let Some(v) = values.get(&field.id) {
                    println!("{} = {}", field.id, v.to_json());
                }
            }
        }
    }
}
