//! A preview session: load a form, type into it, resolve, validate.

use formwright_core::{initial_values, FieldDefinition, FieldValue};
use formwright_eval::{validate_form, EvalError, Resolver};
use rust_decimal::Decimal;
use serde_json::json;
use time::macros::date;

fn form() -> Vec<FieldDefinition> {
    serde_json::from_value(json!([
        { "id": "name", "type": "text", "label": "Name", "required": true,
          "validation": { "minLength": 2 } },
        { "id": "email", "type": "text", "label": "Email",
          "validation": { "email": true } },
        { "id": "dob", "type": "date", "label": "Date of birth", "required": true },
        { "id": "age", "type": "number", "label": "Age",
          "derivedFrom": "dob", "formula": "age" },
        { "id": "celsius", "type": "number", "label": "Celsius",
          "validation": { "min": -273.15 } },
        { "id": "fahrenheit", "type": "number", "label": "Fahrenheit",
          "derivedFrom": "celsius", "formula": "value * 9 / 5 + 32" },
        { "id": "ratio", "type": "number", "label": "Ratio",
          "derivedFrom": "celsius", "formula": "100 / value" },
        { "id": "terms", "type": "checkbox", "label": "Accept terms", "required": true }
    ]))
    .unwrap()
}

#[test]
fn fresh_form_fails_validation_until_filled() {
    let fields = form();
    let values = initial_values(&fields);
    assert_eq!(values["terms"], FieldValue::Bool(false));

    let result = validate_form(&fields, &values);
    assert!(result.has_errors);
    assert_eq!(
        result.errors.keys().collect::<Vec<_>>(),
        vec!["dob", "name"]
    );
}

#[test]
fn typing_resolves_derived_fields_once() {
    let fields = form();
    let resolver = Resolver::new(date!(2024 - 06 - 15));
    let mut values = initial_values(&fields);
    values.insert("name".into(), "Ada".into());
    values.insert("dob".into(), "2000-06-15".into());
    values.insert("celsius".into(), "100".into());

    let r = resolver.resolve_to_fixed_point(&fields, &values).unwrap();
    assert!(r.changed);
    assert_eq!(r.values["age"], FieldValue::Number(Decimal::from(24)));
    assert_eq!(r.values["fahrenheit"], FieldValue::Number(Decimal::from(212)));
    assert_eq!(r.values["ratio"], FieldValue::Number(Decimal::from(1)));

    let again = resolver.resolve(&fields, &r.values);
    assert!(!again.changed);

    let result = validate_form(&fields, &r.values);
    assert!(!result.has_errors, "{:?}", result.errors);
}

#[test]
fn zero_parent_reports_division_by_zero_and_keeps_going() {
    let fields = form();
    let resolver = Resolver::new(date!(2024 - 06 - 15));
    let mut values = initial_values(&fields);
    values.insert("celsius".into(), "0".into());

    let r = resolver.resolve(&fields, &values);
    assert_eq!(r.values["fahrenheit"], FieldValue::Number(Decimal::from(32)));
    assert_eq!(r.values["ratio"], FieldValue::empty());
    assert_eq!(r.problems.len(), 1);
    assert_eq!(r.problems[0].field_id, "ratio");
    assert_eq!(r.problems[0].error, EvalError::DivisionByZero);
}

#[test]
fn below_absolute_zero_is_rejected() {
    let fields = form();
    let mut values = initial_values(&fields);
    values.insert("name".into(), "Ada".into());
    values.insert("dob".into(), "2000-06-15".into());
    values.insert("celsius".into(), "-300".into());
    values.insert("email".into(), "not-an-email".into());

    let result = validate_form(&fields, &values);
    assert_eq!(
        result.errors["celsius"],
        vec!["Minimum value is -273.15".to_string()]
    );
    assert_eq!(
        result.errors["email"],
        vec!["Please enter a valid email address".to_string()]
    );
}
