use async_trait::async_trait;

use formwright_core::FieldDefinition;

use crate::error::StorageError;
use crate::record::SavedForm;

/// Storage for named form definitions.
///
/// Field lists must round-trip losslessly: whatever `save` accepts,
/// `get` and `list_all` return unchanged, including an absent
/// `derivedFrom`.
///
/// Implementations must be `Send + Sync + 'static` so a store can be shared
/// across async tasks.
#[async_trait]
pub trait FormStore: Send + Sync + 'static {
    /// Insert or replace the form called `name` (compared after trimming).
    ///
    /// A new form gets a fresh id and `created_at == updated_at`. Saving
    /// over an existing name replaces its fields, keeps its id and
    /// `created_at`, and refreshes `updated_at`.
    ///
    /// Returns `Err(StorageError::InvalidName)` for a blank name,
    /// `Err(StorageError::EmptyForm)` for an empty field list and
    /// `Err(StorageError::Integrity)` for a field list that fails
    /// [`formwright_core::check_integrity`].
    async fn save(
        &self,
        name: &str,
        fields: Vec<FieldDefinition>,
    ) -> Result<SavedForm, StorageError>;

    /// Returns `Err(StorageError::FormNotFound)` if no form has this id.
    async fn get(&self, id: &str) -> Result<SavedForm, StorageError>;

    /// Returns `Err(StorageError::FormNotFound)` if no form has this id.
    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// Every saved form, oldest first.
    async fn list_all(&self) -> Result<Vec<SavedForm>, StorageError>;
}
