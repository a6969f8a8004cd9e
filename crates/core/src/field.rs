//! Field definitions: the shape of one form field.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::UnknownFieldType;
use crate::value::{FieldValue, FormValues};

/// The kind of input control a field represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
        }
    }

    /// Label prefix for new fields, e.g. `"Number"` for `"Number Field"`.
    pub fn display_name(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Textarea => "Textarea",
            FieldType::Select => "Select",
            FieldType::Radio => "Radio",
            FieldType::Checkbox => "Checkbox",
            FieldType::Date => "Date",
        }
    }

    /// Select and radio fields choose from a list of options.
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    /// Only number and date fields can feed a derived field.
    pub fn can_be_parent(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Date)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// Validation rules attached to a field.
///
/// `email`, `password`, `minLength` and `maxLength` are string rules;
/// `min` and `max` are numeric bounds for number fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_length"
    )]
    pub min_length: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_length"
    )]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub email: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub password: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "lenient::opt_decimal"
    )]
    pub min: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "lenient::opt_decimal"
    )]
    pub max: Option<Decimal>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One form field.
///
/// A field with `derived_from` set is computed from its parent field using
/// `formula` and is not user-editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "FieldValue::empty")]
    pub default_value: FieldValue,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub derived_from: Option<String>,
    #[serde(default)]
    pub formula: String,
}

impl FieldDefinition {
    /// A new field of `field_type` with a fresh id and the stock defaults
    /// for that type.
    pub fn new(field_type: FieldType) -> Self {
        let default_value = if field_type == FieldType::Checkbox {
            FieldValue::Bool(false)
        } else {
            FieldValue::empty()
        };
        let options = if field_type.has_options() {
            vec![option_label(1)]
        } else {
            Vec::new()
        };
        FieldDefinition {
            id: uuid::Uuid::new_v4().to_string(),
            field_type,
            label: format!("{} Field", field_type.display_name()),
            required: false,
            default_value,
            validation: ValidationRules::default(),
            options,
            derived_from: None,
            formula: String::new(),
        }
    }

    /// The parent field id, treating an empty reference as none.
    pub fn parent_id(&self) -> Option<&str> {
        self.derived_from.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_derived(&self) -> bool {
        self.parent_id().is_some()
    }

    /// Drop the derivation, leaving an ordinary input field.
    pub fn clear_derivation(&mut self) {
        self.derived_from = None;
        self.formula.clear();
    }

    /// The value a freshly displayed form starts with.
    pub fn initial_value(&self) -> FieldValue {
        match (&self.field_type, &self.default_value) {
            (FieldType::Checkbox, FieldValue::Bool(b)) => FieldValue::Bool(*b),
            (FieldType::Checkbox, _) => FieldValue::Bool(false),
            (_, FieldValue::Bool(_)) => FieldValue::empty(),
            (_, v) => v.clone(),
        }
    }
}

/// Stock label for the `n`th option of a select or radio field.
pub fn option_label(n: usize) -> String {
    format!("Option {}", n)
}

pub fn find_field<'a>(fields: &'a [FieldDefinition], id: &str) -> Option<&'a FieldDefinition> {
    fields.iter().find(|f| f.id == id)
}

/// Build the value map a form starts with when loaded for display or reset.
pub fn initial_values(fields: &[FieldDefinition]) -> FormValues {
    fields
        .iter()
        .map(|f| (f.id.clone(), f.initial_value()))
        .collect()
}

/// Serde helpers that accept rule parameters typed as numbers or numeric
/// strings, since editors commonly store text-box contents verbatim.
mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::value::parse_decimal;

    /// Lengths of zero, empty strings and `null` all mean "no rule".
    pub fn opt_length<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(d)?;
        let n = match raw {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(other) => {
                return Err(serde::de::Error::custom(format!(
                    "expected a length, got {}",
                    other
                )))
            }
        };
        let n = n.ok_or_else(|| serde::de::Error::custom("length must be a non-negative integer"))?;
        let n = u32::try_from(n).map_err(serde::de::Error::custom)?;
        Ok((n > 0).then_some(n))
    }

    pub mod opt_decimal {
        use super::*;

        pub fn serialize<S: Serializer>(v: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
            match v {
                Some(d) => rust_decimal::serde::arbitrary_precision::serialize(&d.normalize(), s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
            let raw = Option::<serde_json::Value>::deserialize(d)?;
            match raw {
                None | Some(serde_json::Value::Null) => Ok(None),
                Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
                Some(serde_json::Value::String(s)) => parse_decimal(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid number '{}'", s))),
                Some(serde_json::Value::Number(n)) => parse_decimal(&n.to_string())
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("number {} out of range", n))),
                Some(other) => Err(serde::de::Error::custom(format!(
                    "expected a number, got {}",
                    other
                ))),
            }
        }
    }
}
