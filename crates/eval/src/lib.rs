//! Formwright evaluator: recomputes derived fields and validates form
//! values.
//!
//! The two entry points a preview layer needs are [`Resolver::resolve`]
//! (or [`Resolver::resolve_to_fixed_point`]) whenever the value map
//! changes, and [`validate_form`] before submission. Both are pure: inputs
//! are borrowed and a fresh result is returned.

pub mod dates;
mod error;
pub mod numeric;
pub mod resolve;
pub mod validate;

pub use error::{ConsistencyError, EvalError};
pub use numeric::evaluate_formula;
pub use resolve::{resolve, DerivationProblem, Resolution, Resolver};
pub use validate::{validate_field, validate_form, FormValidation, ValidationResult};
