//! `save`, `list`, `show` and `delete` against the file-backed store.

use std::future::Future;
use std::path::Path;
use std::process;

use formwright_storage::{FileBackend, FormStore, KvFormStore, SavedForm};

use crate::input::read_form;
use crate::{print_json, report_error, OutputFormat};

fn open_store(dir: &Path) -> KvFormStore<FileBackend> {
    KvFormStore::new(FileBackend::new(dir))
}

/// Drive a store future to completion on a fresh runtime, exiting with
/// status 1 on error.
fn run<T, Fut>(fut: Fut, output: OutputFormat, quiet: bool) -> T
where
    Fut: Future<Output = Result<T, formwright_storage::StorageError>>,
{
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("failed to create tokio runtime: {}", e), output, quiet);
            process::exit(1);
        }
    };
    match rt.block_on(fut) {
        Ok(v) => v,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn cmd_save(
    store_dir: &Path,
    form_path: &Path,
    name: &str,
    output: OutputFormat,
    quiet: bool,
) {
    // The store runs its own integrity check and reports every violation.
    let fields = match read_form(form_path) {
        Ok(f) => f,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };
    let store = open_store(store_dir);
    let saved = run(store.save(name, fields), output, quiet);
    match output {
        OutputFormat::Json => print_json(&saved),
        OutputFormat::Text => {
            if !quiet {
                println!("saved '{}' ({})", saved.name, saved.id);
            }
        }
    }
}

pub(crate) fn cmd_list(store_dir: &Path, output: OutputFormat, quiet: bool) {
    let store = open_store(store_dir);
    let forms = run(store.list_all(), output, quiet);
    match output {
        OutputFormat::Json => print_json(&forms),
        OutputFormat::Text => {
            if forms.is_empty() && !quiet {
                println!("no saved forms");
            }
            for f in &forms {
                println!(
                    "{}  {}  {} field(s)  updated {}",
                    f.id,
                    f.name,
                    f.fields.len(),
                    f.updated_at
                );
            }
        }
    }
}

pub(crate) fn cmd_show(store_dir: &Path, id: &str, output: OutputFormat, quiet: bool) {
    let store = open_store(store_dir);
    let form = run(store.get(id), output, quiet);
    match output {
        OutputFormat::Json => print_json(&form),
        OutputFormat::Text => print_form(&form),
    }
}

pub(crate) fn cmd_delete(store_dir: &Path, id: &str, output: OutputFormat, quiet: bool) {
    let store = open_store(store_dir);
    run(store.delete(id), output, quiet);
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({ "deleted": id })),
        OutputFormat::Text => {
            if !quiet {
                println!("deleted {}", id);
            }
        }
    }
}

fn print_form(form: &SavedForm) {
    println!("{} ({})", form.name, form.id);
    println!("created {}  updated {}", form.created_at, form.updated_at);
    for f in &form.fields {
        let required = if f.required { " *" } else { "" };
        match f.parent_id() {
            Some(parent) => println!(
                "  {:<16} {:<8} {}{}  <- {}: {}",
                f.id, f.field_type.as_str(), f.label, required, parent, f.formula
            ),
            None => println!("  {:<16} {:<8} {}{}", f.id, f.field_type.as_str(), f.label, required),
        }
    }
}
