//! Whole-form consistency checks run when a field list is loaded.
//!
//! The editor never offers a derived field as a parent, but a field list can
//! also arrive from a file or an API call. These checks reject anything the
//! editor would have refused, chained derivation in particular.

use std::collections::HashSet;

use crate::error::IntegrityError;
use crate::field::{find_field, FieldDefinition};
use crate::formula::validate_formula;

/// Check every field-list invariant, collecting all violations.
pub fn check_integrity(fields: &[FieldDefinition]) -> Result<(), Vec<IntegrityError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for field in fields {
        if !seen.insert(field.id.as_str()) {
            errors.push(IntegrityError::DuplicateId {
                id: field.id.clone(),
            });
        }

        if field.field_type.has_options() && field.options.is_empty() {
            errors.push(IntegrityError::MissingOptions {
                field_id: field.id.clone(),
                field_type: field.field_type,
            });
        }

        if let Some(parent_id) = field.parent_id() {
            if let Err(e) = check_derivation(fields, field, parent_id) {
                errors.push(e);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_derivation(
    fields: &[FieldDefinition],
    field: &FieldDefinition,
    parent_id: &str,
) -> Result<(), IntegrityError> {
    if parent_id == field.id {
        return Err(IntegrityError::SelfDerivation {
            field_id: field.id.clone(),
        });
    }
    let parent = find_field(fields, parent_id).ok_or_else(|| IntegrityError::DanglingParent {
        field_id: field.id.clone(),
        parent_id: parent_id.to_string(),
    })?;
    if parent.is_derived() {
        return Err(IntegrityError::ChainedDerivation {
            field_id: field.id.clone(),
            parent_id: parent_id.to_string(),
        });
    }
    if !parent.field_type.can_be_parent() {
        return Err(IntegrityError::InvalidParentType {
            field_id: field.id.clone(),
            parent_id: parent_id.to_string(),
            parent_type: parent.field_type,
        });
    }
    // A parent picked before its formula is typed in is a legal state.
    if !field.formula.is_empty() {
        validate_formula(&field.formula, parent.field_type).map_err(|source| {
            IntegrityError::InvalidFormula {
                field_id: field.id.clone(),
                source,
            }
        })?;
    }
    Ok(())
}
