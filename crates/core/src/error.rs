use crate::field::FieldType;

/// A lexing or parsing failure inside an arithmetic expression.
///
/// `offset` is the byte offset into the expression where the problem was
/// detected (the expression length for end-of-input problems).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            offset,
            message: message.into(),
        }
    }
}

/// Why a formula was rejected for a given parent field type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula cannot be empty")]
    Empty,

    #[error("formula requires a {expected} parent field, but the parent is {found}")]
    TypeMismatch { expected: FieldType, found: FieldType },

    /// The formula names `value` but does not form a well-formed arithmetic
    /// expression using only digits, whitespace, `+ - * / ( )` and `.`.
    #[error("invalid formula syntax: {0}")]
    InvalidSyntax(String),

    #[error("formula must be \"age\" for date fields or contain \"value\" for number fields")]
    UnrecognizedGrammar,
}

/// Returned when a string does not name a known field type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type '{0}'")]
pub struct UnknownFieldType(pub String);

/// A broken invariant found while checking a field list as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("duplicate field id '{id}'")]
    DuplicateId { id: String },

    #[error("field '{field_id}' derives from unknown field '{parent_id}'")]
    DanglingParent { field_id: String, parent_id: String },

    #[error("field '{field_id}' derives from itself")]
    SelfDerivation { field_id: String },

    #[error("field '{field_id}' derives from '{parent_id}' of type {parent_type}; only number and date fields can be parents")]
    InvalidParentType {
        field_id: String,
        parent_id: String,
        parent_type: FieldType,
    },

    #[error("field '{field_id}' derives from '{parent_id}', which is itself derived")]
    ChainedDerivation { field_id: String, parent_id: String },

    #[error("field '{field_id}' has an invalid formula: {source}")]
    InvalidFormula {
        field_id: String,
        #[source]
        source: FormulaError,
    },

    #[error("field '{field_id}' is a {field_type} field with no options")]
    MissingOptions {
        field_id: String,
        field_type: FieldType,
    },
}

/// A field edit that was rejected. The field list is unchanged when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("field not found: {id}")]
    FieldNotFound { id: String },

    #[error("parent field not found: {id}")]
    UnknownParent { id: String },

    #[error("a field cannot derive from itself")]
    SelfDerivation,

    #[error("field '{parent_id}' is derived and cannot be used as a parent")]
    DerivedParent { parent_id: String },

    #[error("{parent_type} fields cannot be used as a parent; use a number or date field")]
    InvalidParentType { parent_type: FieldType },

    #[error("field '{field_id}' is a parent of other fields and cannot become derived")]
    ChainedDerivation { field_id: String },

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error("{field_type} fields need at least one option")]
    EmptyOptions { field_type: FieldType },

    #[error("option index {index} out of range ({len} options)")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("field index {index} out of range ({len} fields)")]
    IndexOutOfRange { index: usize, len: usize },
}
