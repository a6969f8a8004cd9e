/// Why a derived value could not be computed from an arithmetic formula.
///
/// These are recovered by the resolver: the derived field keeps its prior
/// value and the problem is reported alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The substituted expression contains characters outside the
    /// arithmetic allow-list.
    #[error("expression '{expression}' contains disallowed characters")]
    Unsafe { expression: String },

    #[error("malformed expression '{expression}': {message}")]
    Syntax { expression: String, message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow in {op}")]
    Overflow { op: &'static str },
}

/// A second resolver pass still changed values.
///
/// With single-level derivation one pass always reaches a fixed point, so
/// this means a derived field is fed by another derived field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("derived values did not settle after {passes} passes; still changing: {}", field_ids.join(", "))]
pub struct ConsistencyError {
    pub passes: usize,
    pub field_ids: Vec<String>,
}
