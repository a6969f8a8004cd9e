//! In-memory form editing.
//!
//! `FormBuilder` owns an ordered field list and applies edits to it. Edits
//! that would break a derivation invariant are rejected with a
//! [`BuilderError`] and leave the list untouched; edits that orphan a
//! derived field (deleting or retyping its parent) clear that field's
//! derivation instead of leaving a dangling reference.

use crate::error::BuilderError;
use crate::field::{find_field, option_label, FieldDefinition, FieldType, ValidationRules};
use crate::formula::validate_formula;
use crate::value::{FieldValue, FormValues};

/// A partial update to one field. `None` leaves the attribute unchanged.
///
/// `derived_from` is doubly optional: `Some(None)` removes the derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPatch {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub default_value: Option<FieldValue>,
    pub validation: Option<ValidationRules>,
    pub options: Option<Vec<String>>,
    pub derived_from: Option<Option<String>>,
    pub formula: Option<String>,
}

impl FieldPatch {
    fn touches_derivation(&self) -> bool {
        self.derived_from.is_some() || self.formula.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuilder {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing an existing field list.
    pub fn load(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        FormBuilder {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FieldDefinition> {
        self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        find_field(&self.fields, id)
    }

    /// Drop all fields and the form name.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.name.clear();
    }

    /// Append a new field of `field_type`, returning its id.
    pub fn add_field(&mut self, field_type: FieldType) -> String {
        let field = FieldDefinition::new(field_type);
        let id = field.id.clone();
        self.fields.push(field);
        id
    }

    /// Apply `patch` to field `id`.
    ///
    /// Returns the ids of other fields whose derivation was cleared because
    /// a type change made their formula unusable.
    pub fn update_field(&mut self, id: &str, patch: FieldPatch) -> Result<Vec<String>, BuilderError> {
        let index = self.index_of(id)?;
        let original = &self.fields[index];
        let mut candidate = original.clone();

        if let Some(t) = patch.field_type {
            candidate.field_type = t;
        }
        if let Some(label) = &patch.label {
            candidate.label = label.clone();
        }
        if let Some(required) = patch.required {
            candidate.required = required;
        }
        if let Some(v) = &patch.default_value {
            candidate.default_value = v.clone();
        }
        if let Some(rules) = &patch.validation {
            candidate.validation = rules.clone();
        }
        if let Some(options) = &patch.options {
            candidate.options = options.clone();
        }
        if let Some(parent) = &patch.derived_from {
            candidate.derived_from = parent.clone().filter(|p| !p.is_empty());
            if candidate.derived_from.is_none() {
                candidate.formula.clear();
            }
        }
        if let Some(formula) = &patch.formula {
            if candidate.is_derived() {
                candidate.formula = formula.clone();
            }
        }

        if candidate.field_type.has_options() && candidate.options.is_empty() {
            if patch.options.is_some() {
                return Err(BuilderError::EmptyOptions {
                    field_type: candidate.field_type,
                });
            }
            candidate.options.push(option_label(1));
        }

        if patch.touches_derivation() {
            if let Some(parent_id) = candidate.parent_id() {
                self.check_parent(&candidate, parent_id)?;
            }
        }

        let retyped = candidate.field_type != original.field_type;
        self.fields[index] = candidate;

        if !retyped {
            return Ok(Vec::new());
        }
        let new_type = self.fields[index].field_type;
        let mut cleared = Vec::new();
        for dependent in self.fields.iter_mut() {
            if dependent.parent_id() != Some(id) {
                continue;
            }
            let still_fits = new_type.can_be_parent()
                && (dependent.formula.is_empty()
                    || validate_formula(&dependent.formula, new_type).is_ok());
            if !still_fits {
                dependent.clear_derivation();
                cleared.push(dependent.id.clone());
            }
        }
        Ok(cleared)
    }

    /// Remove field `id`, clearing the derivation of every field that
    /// derived from it. Returns the ids of those fields.
    pub fn delete_field(&mut self, id: &str) -> Result<Vec<String>, BuilderError> {
        let index = self.index_of(id)?;
        self.fields.remove(index);
        let mut cleared = Vec::new();
        for field in self.fields.iter_mut() {
            if field.parent_id() == Some(id) {
                field.clear_derivation();
                cleared.push(field.id.clone());
            }
        }
        Ok(cleared)
    }

    /// Move the field at `from` so that it ends up at index `to`.
    pub fn reorder_fields(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        let len = self.fields.len();
        for index in [from, to] {
            if index >= len {
                return Err(BuilderError::IndexOutOfRange { index, len });
            }
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        Ok(())
    }

    /// Append a stock option (`"Option N"`) to a select or radio field.
    pub fn add_option(&mut self, id: &str) -> Result<(), BuilderError> {
        let index = self.index_of(id)?;
        let options = &mut self.fields[index].options;
        options.push(option_label(options.len() + 1));
        Ok(())
    }

    pub fn set_option(&mut self, id: &str, option: usize, text: impl Into<String>) -> Result<(), BuilderError> {
        let index = self.index_of(id)?;
        let options = &mut self.fields[index].options;
        let len = options.len();
        let slot = options
            .get_mut(option)
            .ok_or(BuilderError::OptionOutOfRange { index: option, len })?;
        *slot = text.into();
        Ok(())
    }

    /// Remove one option. A select or radio field always keeps at least one.
    pub fn remove_option(&mut self, id: &str, option: usize) -> Result<(), BuilderError> {
        let index = self.index_of(id)?;
        let field = &mut self.fields[index];
        let len = field.options.len();
        if option >= len {
            return Err(BuilderError::OptionOutOfRange { index: option, len });
        }
        if field.field_type.has_options() && len == 1 {
            return Err(BuilderError::EmptyOptions {
                field_type: field.field_type,
            });
        }
        field.options.remove(option);
        Ok(())
    }

    /// Fields that `field_id` may derive from: every other non-derived
    /// number or date field.
    pub fn available_parents(&self, field_id: &str) -> Vec<&FieldDefinition> {
        available_parents(&self.fields, field_id)
    }

    /// The value map a preview of this form starts with.
    pub fn initial_values(&self) -> FormValues {
        crate::field::initial_values(&self.fields)
    }

    fn index_of(&self, id: &str) -> Result<usize, BuilderError> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| BuilderError::FieldNotFound { id: id.to_string() })
    }

    fn check_parent(&self, candidate: &FieldDefinition, parent_id: &str) -> Result<(), BuilderError> {
        if parent_id == candidate.id {
            return Err(BuilderError::SelfDerivation);
        }
        let parent = self.field(parent_id).ok_or_else(|| BuilderError::UnknownParent {
            id: parent_id.to_string(),
        })?;
        if parent.is_derived() {
            return Err(BuilderError::DerivedParent {
                parent_id: parent_id.to_string(),
            });
        }
        if !parent.field_type.can_be_parent() {
            return Err(BuilderError::InvalidParentType {
                parent_type: parent.field_type,
            });
        }
        if self
            .fields
            .iter()
            .any(|f| f.parent_id() == Some(candidate.id.as_str()))
        {
            return Err(BuilderError::ChainedDerivation {
                field_id: candidate.id.clone(),
            });
        }
        if !candidate.formula.is_empty() {
            validate_formula(&candidate.formula, parent.field_type)?;
        }
        Ok(())
    }
}

/// Candidate parents for `field_id` within `fields`.
pub fn available_parents<'a>(fields: &'a [FieldDefinition], field_id: &str) -> Vec<&'a FieldDefinition> {
    fields
        .iter()
        .filter(|f| f.id != field_id && !f.is_derived() && f.field_type.can_be_parent())
        .collect()
}
