use std::sync::atomic::{AtomicUsize, Ordering};

use formwright_storage::conformance::run_conformance_suite;
use formwright_storage::{FileBackend, KvFormStore, MemoryBackend};

#[tokio::test]
async fn memory_backend_conformance() {
    let report = run_conformance_suite(|| async { KvFormStore::new(MemoryBackend::new()) }).await;
    assert!(report.total > 0);
    assert!(report.failed == 0, "{report}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn file_backend_conformance() {
    let root = tempfile::tempdir().unwrap();
    let next = AtomicUsize::new(0);
    let report = run_conformance_suite(|| {
        let dir = root
            .path()
            .join(format!("store-{}", next.fetch_add(1, Ordering::SeqCst)));
        async move { KvFormStore::new(FileBackend::new(dir)) }
    })
    .await;
    assert!(report.failed == 0, "{report}");
}

#[tokio::test]
async fn file_backend_survives_reopen() {
    use formwright_core::{FieldDefinition, FieldType};
    use formwright_storage::FormStore;

    let root = tempfile::tempdir().unwrap();
    let saved = {
        let store = KvFormStore::new(FileBackend::new(root.path()));
        store
            .save("Persistent", vec![FieldDefinition::new(FieldType::Date)])
            .await
            .unwrap()
    };
    let reopened = KvFormStore::new(FileBackend::new(root.path()));
    assert_eq!(reopened.get(&saved.id).await.unwrap(), saved);
}
