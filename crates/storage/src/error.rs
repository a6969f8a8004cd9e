use formwright_core::IntegrityError;

/// All errors that can be returned by a FormStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No saved form has the given id.
    #[error("form not found: {id}")]
    FormNotFound { id: String },

    /// The form name is empty after trimming.
    #[error("form name must not be blank")]
    InvalidName,

    #[error("a form must have at least one field")]
    EmptyForm,

    /// The field list breaks a derivation or uniqueness rule.
    #[error("form has {} integrity error(s): {}", .0.len(), join(.0))]
    Integrity(Vec<IntegrityError>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backend-specific storage error (I/O, clock, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}

fn join(errors: &[IntegrityError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
