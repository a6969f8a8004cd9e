use std::future::Future;
use std::sync::Arc;

use super::{sample_fields, TestResult};
use crate::{FormStore, StorageError};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "concurrent",
            "concurrent_saves_of_distinct_names_all_persist",
            concurrent_saves_of_distinct_names_all_persist(factory).await,
        ),
        TestResult::from_result(
            "concurrent",
            "concurrent_saves_of_one_name_yield_one_form",
            concurrent_saves_of_one_name_yield_one_form(factory).await,
        ),
    ]
}

/// N tasks each save a differently named form. No write may be lost to a
/// racing read-modify-write.
async fn concurrent_saves_of_distinct_names_all_persist<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = Arc::new(factory().await);
    let mut handles = Vec::new();
    for i in 0..N {
        let s = store.clone();
        handles.push(tokio::spawn(async move {
            s.save(&format!("form-{i}"), sample_fields()).await
        }));
    }
    for h in handles {
        h.await
            .map_err(|e| format!("task panicked: {e}"))?
            .map_err(|e: StorageError| e.to_string())?;
    }
    let all = store.list_all().await.map_err(|e| e.to_string())?;
    if all.len() != N {
        return Err(format!("expected {N} forms, got {}", all.len()));
    }
    Ok(())
}

/// N tasks save under the same name. Exactly one form exists afterwards
/// and every task saw the same id.
async fn concurrent_saves_of_one_name_yield_one_form<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = Arc::new(factory().await);
    let mut handles = Vec::new();
    for _ in 0..N {
        let s = store.clone();
        handles.push(tokio::spawn(
            async move { s.save("Shared", sample_fields()).await },
        ));
    }
    let mut ids = Vec::new();
    for h in handles {
        let saved = h
            .await
            .map_err(|e| format!("task panicked: {e}"))?
            .map_err(|e| e.to_string())?;
        ids.push(saved.id);
    }
    ids.dedup();
    if ids.len() != 1 {
        return Err(format!("saves under one name produced ids {ids:?}"));
    }
    let all = store.list_all().await.map_err(|e| e.to_string())?;
    if all.len() != 1 {
        return Err(format!("expected 1 form, got {}", all.len()));
    }
    Ok(())
}
