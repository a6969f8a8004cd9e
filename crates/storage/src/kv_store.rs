use async_trait::async_trait;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use formwright_core::{check_integrity, FieldDefinition};

use crate::backend::KeyValueBackend;
use crate::error::StorageError;
use crate::record::SavedForm;
use crate::traits::FormStore;

/// Backend key holding the JSON array of every saved form.
pub const SAVED_FORMS_KEY: &str = "savedForms";

/// Backend key that receives undecodable [`SAVED_FORMS_KEY`] contents
/// before a write replaces them.
pub const SAVED_FORMS_BACKUP_KEY: &str = "savedForms.bak";

/// A [`FormStore`] that keeps all forms as one JSON array under
/// [`SAVED_FORMS_KEY`].
///
/// Every mutation is a read-modify-write of that array, serialized by an
/// internal lock. Data that cannot be decoded is treated as an empty list;
/// the first write after that copies the raw bytes to
/// [`SAVED_FORMS_BACKUP_KEY`] before replacing them.
pub struct KvFormStore<B> {
    backend: B,
    write_lock: Mutex<()>,
}

impl<B: KeyValueBackend> KvFormStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn load(&self) -> Result<Vec<SavedForm>, StorageError> {
        Ok(self.load_raw().await?.0)
    }

    /// Load for a read-modify-write. Unreadable contents are backed up first
    /// so the following [`store`](Self::store) does not lose them.
    async fn load_for_update(&self) -> Result<Vec<SavedForm>, StorageError> {
        let (forms, unreadable) = self.load_raw().await?;
        if let Some(bytes) = unreadable {
            self.backend.set(SAVED_FORMS_BACKUP_KEY, bytes).await?;
            warn!(
                key = SAVED_FORMS_KEY,
                backup = SAVED_FORMS_BACKUP_KEY,
                "unreadable stored forms backed up before being replaced"
            );
        }
        Ok(forms)
    }

    async fn load_raw(&self) -> Result<(Vec<SavedForm>, Option<Vec<u8>>), StorageError> {
        let Some(bytes) = self.backend.get(SAVED_FORMS_KEY).await? else {
            return Ok((Vec::new(), None));
        };
        match serde_json::from_slice(&bytes) {
            Ok(forms) => Ok((forms, None)),
            Err(e) => {
                warn!(key = SAVED_FORMS_KEY, error = %e, "stored forms unreadable; starting empty");
                Ok((Vec::new(), Some(bytes)))
            }
        }
    }

    async fn store(&self, forms: &[SavedForm]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(forms)?;
        self.backend.set(SAVED_FORMS_KEY, bytes).await
    }
}

fn now_rfc3339() -> Result<String, StorageError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| StorageError::Backend(format!("cannot format timestamp: {e}")))
}

#[async_trait]
impl<B: KeyValueBackend> FormStore for KvFormStore<B> {
    async fn save(
        &self,
        name: &str,
        fields: Vec<FieldDefinition>,
    ) -> Result<SavedForm, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidName);
        }
        if fields.is_empty() {
            return Err(StorageError::EmptyForm);
        }
        check_integrity(&fields).map_err(StorageError::Integrity)?;

        let _guard = self.write_lock.lock().await;
        let mut forms = self.load_for_update().await?;
        let now = now_rfc3339()?;

        let saved = match forms.iter_mut().find(|f| f.name == name) {
            Some(existing) => {
                existing.fields = fields;
                existing.updated_at = now;
                debug!(id = %existing.id, name, "form replaced");
                existing.clone()
            }
            None => {
                let form = SavedForm {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    fields,
                    created_at: now.clone(),
                    updated_at: now,
                };
                forms.push(form.clone());
                debug!(id = %form.id, name, "form created");
                form
            }
        };

        self.store(&forms).await?;
        info!(id = %saved.id, name, fields = saved.fields.len(), "form saved");
        Ok(saved)
    }

    async fn get(&self, id: &str) -> Result<SavedForm, StorageError> {
        self.load()
            .await?
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| StorageError::FormNotFound { id: id.to_string() })
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut forms = self.load_for_update().await?;
        let before = forms.len();
        forms.retain(|f| f.id != id);
        if forms.len() == before {
            return Err(StorageError::FormNotFound { id: id.to_string() });
        }
        self.store(&forms).await?;
        info!(id, "form deleted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<SavedForm>, StorageError> {
        self.load().await
    }
}
