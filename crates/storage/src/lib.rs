//! Persistence for named form definitions.
//!
//! [`FormStore`] is the interface the rest of Formwright talks to.
//! [`KvFormStore`] implements it over any [`KeyValueBackend`], so the same
//! store logic runs against memory in tests and a directory on disk in the
//! CLI.

mod backend;
pub mod conformance;
mod error;
mod kv_store;
mod record;
mod traits;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::StorageError;
pub use kv_store::{KvFormStore, SAVED_FORMS_BACKUP_KEY, SAVED_FORMS_KEY};
pub use record::SavedForm;
pub use traits::FormStore;
