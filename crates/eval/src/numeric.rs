//! Arithmetic evaluation over `rust_decimal::Decimal`.
//!
//! All operations are checked: overflow and division by zero are errors,
//! never infinities or panics.

use rust_decimal::Decimal;

use formwright_core::ast::{BinOp, Expr};
use formwright_core::formula::{compile, CompileError};

use crate::error::EvalError;

/// Evaluate a parsed expression tree.
pub fn eval_expr(expr: &Expr) -> Result<Decimal, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Neg(inner) => Ok(-eval_expr(inner)?),
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left)?;
            let r = eval_expr(right)?;
            apply(*op, l, r)
        }
    }
}

fn apply(op: BinOp, l: Decimal, r: Decimal) -> Result<Decimal, EvalError> {
    let result = match op {
        BinOp::Add => l.checked_add(r),
        BinOp::Sub => l.checked_sub(r),
        BinOp::Mul => l.checked_mul(r),
        BinOp::Div => {
            if r.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            l.checked_div(r)
        }
    };
    result.ok_or(EvalError::Overflow {
        op: match op {
            BinOp::Add => "addition",
            BinOp::Sub => "subtraction",
            BinOp::Mul => "multiplication",
            BinOp::Div => "division",
        },
    })
}

/// Evaluate an arithmetic formula with `value` bound to `value`.
///
/// The parent value is substituted as text, the allow-list is enforced on
/// the substituted string, and only then is it parsed and evaluated. The
/// result is normalized (no trailing zeros).
pub fn evaluate_formula(formula: &str, value: Decimal) -> Result<Decimal, EvalError> {
    let value_text = value.normalize().to_string();
    let expr = compile(formula, &value_text).map_err(|e| match e {
        CompileError::Disallowed { expression } => EvalError::Unsafe { expression },
        CompileError::Syntax { expression, error } => EvalError::Syntax {
            expression,
            message: error.to_string(),
        },
    })?;
    Ok(eval_expr(&expr)?.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn conventional_precedence() {
        assert_eq!(evaluate_formula("value * 2 + 1", dec("10")), Ok(dec("21")));
        assert_eq!(evaluate_formula("1 + value * 2", dec("10")), Ok(dec("21")));
        assert_eq!(evaluate_formula("(value + 1) * 2", dec("10")), Ok(dec("22")));
        assert_eq!(evaluate_formula("value / 4 / 5", dec("100")), Ok(dec("5")));
    }

    #[test]
    fn decimal_arithmetic_is_exact() {
        assert_eq!(evaluate_formula("value + 0.2", dec("0.1")), Ok(dec("0.3")));
        assert_eq!(evaluate_formula("value * 1.5", dec("2")), Ok(dec("3")));
    }

    #[test]
    fn negative_parent_values_substitute_cleanly() {
        assert_eq!(evaluate_formula("10 - value", dec("-5")), Ok(dec("15")));
        assert_eq!(evaluate_formula("value * value", dec("-3")), Ok(dec("9")));
    }

    #[test]
    fn every_occurrence_of_value_is_replaced() {
        assert_eq!(evaluate_formula("value + value / 2", dec("8")), Ok(dec("12")));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(evaluate_formula("value / 0", dec("5")), Err(EvalError::DivisionByZero));
        assert_eq!(
            evaluate_formula("1 / (value - 5)", dec("5")),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn overflow_is_an_error() {
        let big = Decimal::MAX;
        assert!(matches!(
            evaluate_formula("value * 10", big),
            Err(EvalError::Overflow { op: "multiplication" })
        ));
    }

    #[test]
    fn disallowed_text_never_reaches_the_parser() {
        assert_eq!(
            evaluate_formula("valueOf(1)", dec("2")),
            Err(EvalError::Unsafe {
                expression: "2Of(1)".into()
            })
        );
    }

    #[test]
    fn malformed_expression_is_a_syntax_error() {
        assert!(matches!(
            evaluate_formula("value +", dec("2")),
            Err(EvalError::Syntax { .. })
        ));
        assert!(matches!(
            evaluate_formula("(value", dec("2")),
            Err(EvalError::Syntax { .. })
        ));
    }

    #[test]
    fn very_long_formula_is_a_syntax_error() {
        let formula = format!("value{}", " + 1".repeat(200_000));
        assert!(matches!(
            evaluate_formula(&formula, dec("2")),
            Err(EvalError::Syntax { .. })
        ));
        let formula = format!("value{}", " + 1".repeat(300));
        assert_eq!(evaluate_formula(&formula, dec("2")), Ok(dec("302")));
    }
}
