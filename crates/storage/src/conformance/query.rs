use std::future::Future;

use super::{sample_fields, TestResult};
use crate::{FormStore, StorageError};

pub(super) async fn run_query_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "query",
            "new_store_lists_nothing",
            new_store_lists_nothing(factory).await,
        ),
        TestResult::from_result(
            "query",
            "get_returns_saved_form",
            get_returns_saved_form(factory).await,
        ),
        TestResult::from_result(
            "query",
            "list_all_in_insertion_order",
            list_all_in_insertion_order(factory).await,
        ),
        TestResult::from_result(
            "query",
            "resave_keeps_list_position",
            resave_keeps_list_position(factory).await,
        ),
        TestResult::from_result(
            "query",
            "delete_removes_only_that_form",
            delete_removes_only_that_form(factory).await,
        ),
    ]
}

async fn new_store_lists_nothing<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let all = s.list_all().await.map_err(|e| e.to_string())?;
    if !all.is_empty() {
        return Err(format!("expected empty store, got {} form(s)", all.len()));
    }
    Ok(())
}

async fn get_returns_saved_form<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let saved = s
        .save("Signup", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    let fetched = s.get(&saved.id).await.map_err(|e| e.to_string())?;
    if fetched != saved {
        return Err(format!("get returned {fetched:?}, saved {saved:?}"));
    }
    Ok(())
}

async fn list_all_in_insertion_order<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for name in ["Zeta", "Alpha", "Mid"] {
        s.save(name, sample_fields())
            .await
            .map_err(|e| e.to_string())?;
    }
    let names: Vec<String> = s
        .list_all()
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|f| f.name)
        .collect();
    if names != ["Zeta", "Alpha", "Mid"] {
        return Err(format!("unexpected order: {names:?}"));
    }
    Ok(())
}

async fn resave_keeps_list_position<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for name in ["First", "Second"] {
        s.save(name, sample_fields())
            .await
            .map_err(|e| e.to_string())?;
    }
    s.save("First", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    let names: Vec<String> = s
        .list_all()
        .await
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|f| f.name)
        .collect();
    if names != ["First", "Second"] {
        return Err(format!("unexpected order after resave: {names:?}"));
    }
    Ok(())
}

async fn delete_removes_only_that_form<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let a = s
        .save("A", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    let b = s
        .save("B", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    s.delete(&a.id).await.map_err(|e| e.to_string())?;

    match s.get(&a.id).await {
        Err(StorageError::FormNotFound { .. }) => {}
        Ok(_) => return Err("deleted form is still readable".into()),
        Err(e) => return Err(format!("expected FormNotFound, got: {e}")),
    }
    let remaining = s.list_all().await.map_err(|e| e.to_string())?;
    if remaining.len() != 1 || remaining[0].id != b.id {
        return Err(format!("expected only B to remain, got {remaining:?}"));
    }
    Ok(())
}
