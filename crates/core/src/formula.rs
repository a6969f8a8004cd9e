//! Derived-value formulas.
//!
//! A formula is either the literal `age` (parent must be a date field) or an
//! arithmetic expression in which the token `value` stands for the parent's
//! numeric value (parent must be a number field).

use crate::ast::Expr;
use crate::error::{FormulaError, SyntaxError};
use crate::field::FieldType;
use crate::parser::parse_expression;

pub const AGE_FORMULA: &str = "age";
pub const VALUE_TOKEN: &str = "value";

/// Stand-in for the parent value when checking a formula at edit time.
const PLACEHOLDER_VALUE: &str = "1";

/// The two formula grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula<'a> {
    Age,
    Arithmetic(&'a str),
}

impl Formula<'_> {
    /// The parent field type this formula needs.
    pub fn parent_type(&self) -> FieldType {
        match self {
            Formula::Age => FieldType::Date,
            Formula::Arithmetic(_) => FieldType::Number,
        }
    }
}

/// Recognize which grammar `formula` uses, if any.
///
/// `age` must match exactly; an arithmetic formula is anything containing
/// the `value` token.
pub fn classify(formula: &str) -> Option<Formula<'_>> {
    if formula == AGE_FORMULA {
        Some(Formula::Age)
    } else if formula.contains(VALUE_TOKEN) {
        Some(Formula::Arithmetic(formula))
    } else {
        None
    }
}

/// Replace every `value` token in `formula` with `replacement`.
pub fn substitute(formula: &str, replacement: &str) -> String {
    formula.replace(VALUE_TOKEN, replacement)
}

/// The allow-list applied to an expression after substitution: non-empty
/// and made only of ASCII digits, whitespace, `+ - * / ( )` and `.`.
pub fn is_allowed_expression(expression: &str) -> bool {
    !expression.is_empty()
        && expression
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/().".contains(c))
}

/// Why an arithmetic formula could not be turned into an expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The substituted text contains characters outside the allow-list.
    Disallowed { expression: String },
    Syntax {
        expression: String,
        error: SyntaxError,
    },
}

/// Substitute `value_text` into an arithmetic formula, enforce the
/// allow-list on the result, and parse it.
pub fn compile(formula: &str, value_text: &str) -> Result<Expr, CompileError> {
    let expression = substitute(formula, value_text);
    if !is_allowed_expression(&expression) {
        return Err(CompileError::Disallowed { expression });
    }
    parse_expression(&expression).map_err(|error| CompileError::Syntax { expression, error })
}

/// Check that `formula` is usable on a derived field whose parent has type
/// `parent_type`. Consulted whenever a formula is edited.
pub fn validate_formula(formula: &str, parent_type: FieldType) -> Result<(), FormulaError> {
    if formula.trim().is_empty() {
        return Err(FormulaError::Empty);
    }
    let kind = classify(formula).ok_or(FormulaError::UnrecognizedGrammar)?;
    let expected = kind.parent_type();
    if parent_type != expected {
        return Err(FormulaError::TypeMismatch {
            expected,
            found: parent_type,
        });
    }
    if let Formula::Arithmetic(text) = kind {
        compile(text, PLACEHOLDER_VALUE).map_err(|e| match e {
            CompileError::Disallowed { .. } => FormulaError::InvalidSyntax(
                "only numbers, +, -, *, /, ( and ) are allowed alongside 'value'".to_string(),
            ),
            CompileError::Syntax { error, .. } => FormulaError::InvalidSyntax(error.to_string()),
        })?;
    }
    Ok(())
}
