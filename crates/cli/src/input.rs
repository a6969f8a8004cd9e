//! Reading form and value files from disk.
//!
//! A form file is either a bare JSON array of field definitions or a saved
//! form object carrying a `fields` array. A values file is a JSON object
//! from field id to a string, number, boolean or null.

use std::path::Path;

use serde_json::Value;

use formwright_core::{check_integrity, initial_values, FieldDefinition, FieldValue, FormValues};

/// Parse a form file without any consistency checks.
pub(crate) fn read_form(path: &Path) -> Result<Vec<FieldDefinition>, String> {
    let doc = read_json(path)?;
    let fields = match doc {
        Value::Array(_) => doc,
        Value::Object(mut map) => map.remove("fields").ok_or_else(|| {
            format!(
                "'{}' is an object without a \"fields\" array",
                path.display()
            )
        })?,
        _ => {
            return Err(format!(
                "'{}' must hold a field array or a saved form object",
                path.display()
            ))
        }
    };
    serde_json::from_value(fields)
        .map_err(|e| format!("invalid field definition in '{}': {}", path.display(), e))
}

/// Parse a form file and reject it if it fails the integrity check.
pub(crate) fn load_form(path: &Path) -> Result<Vec<FieldDefinition>, String> {
    let fields = read_form(path)?;
    check_integrity(&fields).map_err(|errors| {
        let mut msg = format!("form '{}' is inconsistent:", path.display());
        for e in &errors {
            msg.push_str("\n  - ");
            msg.push_str(&e.to_string());
        }
        msg
    })?;
    Ok(fields)
}

/// The form's initial values with the entries of a values file laid over
/// them. Ids that match no field are ignored with a warning.
pub(crate) fn load_values(path: &Path, fields: &[FieldDefinition]) -> Result<FormValues, String> {
    let doc = read_json(path)?;
    let Value::Object(entries) = doc else {
        return Err(format!(
            "'{}' must hold an object of field id to value",
            path.display()
        ));
    };

    let mut values = initial_values(fields);
    for (id, raw) in entries {
        let value = FieldValue::from_json(&raw)
            .map_err(|e| format!("value for '{}' in '{}': {}", id, path.display(), e))?;
        if !values.contains_key(&id) {
            tracing::warn!(field_id = %id, "value given for a field the form does not have");
            continue;
        }
        values.insert(id, value);
    }
    Ok(values)
}

fn read_json(path: &Path) -> Result<Value, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading file '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("error parsing JSON in '{}': {}", path.display(), e))
}
