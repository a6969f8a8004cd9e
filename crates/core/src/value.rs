//! Runtime values held in a form's value map.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Mapping from field id to the field's current value.
pub type FormValues = BTreeMap<String, FieldValue>;

/// The value of one field.
///
/// Inputs arrive as text (what a user typed), checkboxes as booleans, and
/// derived fields as numbers. Numbers are `rust_decimal::Decimal`, never
/// `f64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Bool(bool),
}

impl FieldValue {
    /// The empty text value, used for unset inputs.
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "bool",
        }
    }

    /// Whether the value counts as filled in.
    ///
    /// Booleans and numbers are always present; text is present when it
    /// contains something other than whitespace.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => true,
        }
    }

    /// String form of the value, as used by length rules and date parsing.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Number(d) => Cow::Owned(d.normalize().to_string()),
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
        }
    }

    /// Numeric reading of the value. Text is parsed with [`parse_decimal`].
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(d) => Some(*d),
            FieldValue::Text(s) => parse_decimal(s),
            FieldValue::Bool(_) => None,
        }
    }

    /// Convert from JSON. `null` reads as the empty text value; arrays and
    /// objects are rejected.
    pub fn from_json(v: &serde_json::Value) -> Result<FieldValue, String> {
        match v {
            serde_json::Value::Null => Ok(FieldValue::empty()),
            serde_json::Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            serde_json::Value::String(s) => Ok(FieldValue::Text(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(FieldValue::Number(Decimal::from(i)));
                }
                parse_decimal(&n.to_string())
                    .map(FieldValue::Number)
                    .ok_or_else(|| format!("number {} is out of range", n))
            }
            other => Err(format!(
                "expected string, number or boolean, got {}",
                json_type_name(other)
            )),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
            FieldValue::Number(d) => decimal_to_json(*d),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        FieldValue::Number(d)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        FieldValue::from_json(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse user-entered numeric text into a `Decimal`.
///
/// Accepts plain decimal notation (`"10"`, `"-2.5"`) and scientific
/// notation (`"1e3"`). Surrounding whitespace is ignored; anything else
/// yields `None`.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Render a decimal as a JSON number: integral values as integers,
/// fractional values with their exact decimal digits. Falls back to a
/// string when the value cannot be represented as a JSON number.
pub fn decimal_to_json(d: Decimal) -> serde_json::Value {
    let d = d.normalize();
    if d.scale() == 0 {
        if let Some(i) = d.to_i64() {
            return serde_json::Value::from(i);
        }
    }
    let text = d.to_string();
    match serde_json::Number::from_str(&text) {
        Ok(n) => serde_json::Value::Number(n),
        Err(_) => serde_json::Value::String(text),
    }
}

fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
