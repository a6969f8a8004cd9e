//! Derived field resolution.
//!
//! A resolver pass reads parent values from the input map and writes every
//! recomputed derived value into a copy, so a pass never observes its own
//! output. Derivation is single-level, so one pass reaches a fixed point;
//! [`Resolver::resolve_to_fixed_point`] checks that with a second pass.

use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use formwright_core::field::{find_field, FieldDefinition, FieldType};
use formwright_core::formula::{classify, Formula};
use formwright_core::value::{FieldValue, FormValues};

use crate::dates::{age_in_years, parse_date};
use crate::error::{ConsistencyError, EvalError};
use crate::numeric::evaluate_formula;

/// Passes run by [`Resolver::resolve_to_fixed_point`]: one to compute,
/// one to confirm nothing else moves.
pub const FIXED_POINT_PASSES: usize = 2;

/// An evaluation failure recovered during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationProblem {
    pub field_id: String,
    pub formula: String,
    pub error: EvalError,
}

/// Output of a resolver pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub values: FormValues,
    /// True iff at least one derived value was updated.
    pub changed: bool,
    /// Ids of the derived fields whose value was updated, in field order.
    pub updated: Vec<String>,
    pub problems: Vec<DerivationProblem>,
}

/// Recomputes derived fields against a fixed reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    today: Date,
}

impl Resolver {
    /// A resolver that computes ages relative to `today`.
    pub fn new(today: Date) -> Self {
        Resolver { today }
    }

    /// A resolver anchored at the current UTC date.
    pub fn today_utc() -> Self {
        Resolver::new(OffsetDateTime::now_utc().date())
    }

    pub fn today(&self) -> Date {
        self.today
    }

    /// Run one pass over `fields`, returning the updated value map.
    ///
    /// Non-derived fields are never touched. A derived field is skipped
    /// (its value left as is) when its parent is missing, the parent value
    /// is empty or unparsable, or the formula does not fit the parent type.
    /// Evaluation errors leave the prior value in place and are reported in
    /// [`Resolution::problems`].
    pub fn resolve(&self, fields: &[FieldDefinition], values: &FormValues) -> Resolution {
        let mut next = values.clone();
        let mut updated = Vec::new();
        let mut problems = Vec::new();

        for field in fields {
            let Some(parent_id) = field.parent_id() else {
                continue;
            };
            if field.formula.is_empty() {
                continue;
            }
            let computed = match self.derive(fields, field, parent_id, values) {
                Ok(Some(v)) => v,
                Ok(None) => continue,
                Err(error) => {
                    warn!(
                        field_id = %field.id,
                        formula = %field.formula,
                        %error,
                        "derived value could not be computed"
                    );
                    problems.push(DerivationProblem {
                        field_id: field.id.clone(),
                        formula: field.formula.clone(),
                        error,
                    });
                    continue;
                }
            };
            if values.get(&field.id) != Some(&computed) {
                debug!(field_id = %field.id, value = %computed.as_text(), "derived value updated");
                next.insert(field.id.clone(), computed);
                updated.push(field.id.clone());
            }
        }

        Resolution {
            values: next,
            changed: !updated.is_empty(),
            updated,
            problems,
        }
    }

    /// Resolve until no derived value changes.
    ///
    /// Returns the result of the first pass with `changed` reporting whether
    /// that pass updated anything. If the confirming pass still changes
    /// values the field list violates single-level derivation and a
    /// [`ConsistencyError`] is returned.
    pub fn resolve_to_fixed_point(
        &self,
        fields: &[FieldDefinition],
        values: &FormValues,
    ) -> Result<Resolution, ConsistencyError> {
        let first = self.resolve(fields, values);
        if !first.changed {
            return Ok(first);
        }
        let second = self.resolve(fields, &first.values);
        if second.changed {
            return Err(ConsistencyError {
                passes: FIXED_POINT_PASSES,
                field_ids: second.updated,
            });
        }
        Ok(first)
    }

    fn derive(
        &self,
        fields: &[FieldDefinition],
        field: &FieldDefinition,
        parent_id: &str,
        values: &FormValues,
    ) -> Result<Option<FieldValue>, EvalError> {
        let Some(parent) = find_field(fields, parent_id) else {
            debug!(field_id = %field.id, parent_id, "parent field missing; skipping");
            return Ok(None);
        };
        let Some(parent_value) = values.get(parent_id).filter(|v| v.is_present()) else {
            return Ok(None);
        };

        match (classify(&field.formula), parent.field_type) {
            (Some(Formula::Age), FieldType::Date) => {
                let Some(birth) = parse_date(&parent_value.as_text()) else {
                    debug!(field_id = %field.id, parent_id, "parent value is not a date; skipping");
                    return Ok(None);
                };
                let age = age_in_years(birth, self.today);
                Ok(Some(FieldValue::Number(Decimal::from(age))))
            }
            (Some(Formula::Arithmetic(formula)), FieldType::Number) => {
                let Some(n) = parent_value.as_decimal() else {
                    debug!(field_id = %field.id, parent_id, "parent value is not a number; skipping");
                    return Ok(None);
                };
                evaluate_formula(formula, n).map(|d| Some(FieldValue::Number(d)))
            }
            _ => {
                debug!(
                    field_id = %field.id,
                    parent_type = %parent.field_type,
                    formula = %field.formula,
                    "formula does not fit parent type; skipping"
                );
                Ok(None)
            }
        }
    }
}

/// One resolver pass anchored at the current UTC date.
pub fn resolve(fields: &[FieldDefinition], values: &FormValues) -> Resolution {
    Resolver::today_utc().resolve(fields, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use time::macros::date;

    fn field(id: &str, field_type: FieldType) -> FieldDefinition {
        let mut f = FieldDefinition::new(field_type);
        f.id = id.to_string();
        f
    }

    fn derived(id: &str, parent: &str, formula: &str) -> FieldDefinition {
        let mut f = field(id, FieldType::Number);
        f.derived_from = Some(parent.to_string());
        f.formula = formula.to_string();
        f
    }

    fn values(pairs: &[(&str, FieldValue)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn num(s: &str) -> FieldValue {
        FieldValue::Number(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn age_from_date_of_birth() {
        let fields = vec![field("dob", FieldType::Date), derived("age", "dob", "age")];
        let input = values(&[("dob", "2000-06-15".into())]);

        let on_birthday = Resolver::new(date!(2024 - 06 - 15)).resolve(&fields, &input);
        assert_eq!(on_birthday.values["age"], num("24"));
        assert!(on_birthday.changed);

        let day_before = Resolver::new(date!(2024 - 06 - 14)).resolve(&fields, &input);
        assert_eq!(day_before.values["age"], num("23"));
    }

    #[test]
    fn arithmetic_from_number_parent() {
        let fields = vec![
            field("n", FieldType::Number),
            derived("d", "n", "value * 2 + 1"),
        ];
        let r = Resolver::new(date!(2024 - 01 - 01)).resolve(&fields, &values(&[("n", "10".into())]));
        assert_eq!(r.values["d"], num("21"));
        assert_eq!(r.updated, vec!["d".to_string()]);
        assert!(r.problems.is_empty());
    }

    #[test]
    fn evaluation_error_keeps_prior_value() {
        let fields = vec![field("n", FieldType::Number), derived("d", "n", "value / 0")];
        let input = values(&[("n", "5".into()), ("d", num("7"))]);
        let r = Resolver::new(date!(2024 - 01 - 01)).resolve(&fields, &input);
        assert_eq!(r.values["d"], num("7"));
        assert!(!r.changed);
        assert_eq!(
            r.problems,
            vec![DerivationProblem {
                field_id: "d".into(),
                formula: "value / 0".into(),
                error: EvalError::DivisionByZero,
            }]
        );
    }

    #[test]
    fn second_pass_is_unchanged() {
        let fields = vec![
            field("dob", FieldType::Date),
            derived("age", "dob", "age"),
            field("n", FieldType::Number),
            derived("d", "n", "value - 3"),
        ];
        let resolver = Resolver::new(date!(2024 - 06 - 15));
        let first = resolver.resolve(
            &fields,
            &values(&[("dob", "1990-01-01".into()), ("n", "4.5".into())]),
        );
        assert!(first.changed);
        let second = resolver.resolve(&fields, &first.values);
        assert!(!second.changed);
        assert_eq!(second.values, first.values);
    }

    #[test]
    fn non_derived_values_are_never_altered() {
        let fields = vec![
            field("name", FieldType::Text),
            field("n", FieldType::Number),
            derived("d", "n", "value + 1"),
        ];
        let input = values(&[("name", "Ada".into()), ("n", "1".into())]);
        let r = Resolver::new(date!(2024 - 01 - 01)).resolve(&fields, &input);
        assert_eq!(r.values["name"], input["name"]);
        assert_eq!(r.values["n"], input["n"]);
    }

    #[test]
    fn skips_empty_missing_and_mismatched_parents() {
        let fields = vec![
            field("n", FieldType::Number),
            field("dob", FieldType::Date),
            field("t", FieldType::Text),
            derived("empty_parent", "n", "value + 1"),
            derived("orphan", "gone", "value + 1"),
            derived("age_of_number", "n", "age"),
            derived("math_on_date", "dob", "value + 1"),
            derived("from_text", "t", "value + 1"),
            derived("no_formula", "dob", ""),
        ];
        let input = values(&[
            ("n", "   ".into()),
            ("dob", "2000-01-01".into()),
            ("t", "5".into()),
        ]);
        let r = Resolver::new(date!(2024 - 01 - 01)).resolve(&fields, &input);
        assert!(!r.changed);
        assert_eq!(r.values, input);
        assert!(r.problems.is_empty());
    }

    #[test]
    fn unparsable_parent_is_skipped() {
        let fields = vec![
            field("n", FieldType::Number),
            derived("d", "n", "value * 2"),
            field("dob", FieldType::Date),
            derived("age", "dob", "age"),
        ];
        let input = values(&[("n", "twelve".into()), ("dob", "yesterday".into())]);
        let r = Resolver::new(date!(2024 - 01 - 01)).resolve(&fields, &input);
        assert!(!r.changed);
        assert!(r.problems.is_empty());
    }

    #[test]
    fn equal_numeric_value_is_not_a_change() {
        let fields = vec![field("n", FieldType::Number), derived("d", "n", "value * 2")];
        let input = values(&[("n", "1.5".into()), ("d", num("3.0"))]);
        let r = Resolver::new(date!(2024 - 01 - 01)).resolve(&fields, &input);
        assert!(!r.changed);
    }

    #[test]
    fn fixed_point_succeeds_for_single_level_forms() {
        let fields = vec![field("n", FieldType::Number), derived("d", "n", "value + 1")];
        let r = Resolver::new(date!(2024 - 01 - 01))
            .resolve_to_fixed_point(&fields, &values(&[("n", "1".into())]))
            .unwrap();
        assert!(r.changed);
        assert_eq!(r.values["d"], num("2"));
    }

    #[test]
    fn chained_derivation_is_a_consistency_error() {
        let fields = vec![
            field("a", FieldType::Number),
            derived("b", "a", "value + 1"),
            derived("c", "b", "value + 1"),
        ];
        let err = Resolver::new(date!(2024 - 01 - 01))
            .resolve_to_fixed_point(&fields, &values(&[("a", "1".into())]))
            .unwrap_err();
        assert_eq!(
            err,
            ConsistencyError {
                passes: FIXED_POINT_PASSES,
                field_ids: vec!["c".into()]
            }
        );
    }

    #[test]
    fn inputs_are_not_mutated() {
        let fields = vec![field("n", FieldType::Number), derived("d", "n", "value + 1")];
        let input = values(&[("n", "1".into())]);
        let snapshot = input.clone();
        let _ = Resolver::new(date!(2024 - 01 - 01)).resolve(&fields, &input);
        assert_eq!(input, snapshot);
    }
}
