//! Formwright core: the form field model, derived-value formulas and the
//! field-editing operations that keep derivations consistent.
//!
//! Formula text is parsed by a small recursive-descent parser into an
//! [`ast::Expr`] made only of numbers and `+ - * /`. Nothing in this crate
//! evaluates code.

pub mod ast;
pub mod builder;
pub mod error;
pub mod field;
pub mod formula;
pub mod integrity;
pub mod lexer;
pub mod parser;
pub mod value;

pub use builder::{available_parents, FieldPatch, FormBuilder};
pub use error::{BuilderError, FormulaError, IntegrityError, SyntaxError, UnknownFieldType};
pub use field::{find_field, initial_values, FieldDefinition, FieldType, ValidationRules};
pub use formula::{classify, validate_formula, Formula};
pub use integrity::check_integrity;
pub use parser::parse_expression;
pub use value::{parse_decimal, FieldValue, FormValues};
