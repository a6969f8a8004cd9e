use std::future::Future;

use super::{make_derived, make_field, sample_fields, TestResult};
use crate::{FormStore, StorageError};
use formwright_core::{FieldType, IntegrityError};

pub(super) async fn run_error_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "errors",
            "blank_name_returns_invalid_name",
            blank_name_returns_invalid_name(factory).await,
        ),
        TestResult::from_result(
            "errors",
            "no_fields_returns_empty_form",
            no_fields_returns_empty_form(factory).await,
        ),
        TestResult::from_result(
            "errors",
            "chained_derivation_returns_integrity",
            chained_derivation_returns_integrity(factory).await,
        ),
        TestResult::from_result(
            "errors",
            "get_unknown_id_returns_form_not_found",
            get_unknown_id_returns_form_not_found(factory).await,
        ),
        TestResult::from_result(
            "errors",
            "delete_unknown_id_returns_form_not_found",
            delete_unknown_id_returns_form_not_found(factory).await,
        ),
        TestResult::from_result(
            "errors",
            "rejected_save_stores_nothing",
            rejected_save_stores_nothing(factory).await,
        ),
    ]
}

async fn blank_name_returns_invalid_name<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for name in ["", "   ", "\t\n"] {
        match s.save(name, sample_fields()).await {
            Err(StorageError::InvalidName) => {}
            Ok(_) => return Err(format!("name {name:?} was accepted")),
            Err(e) => return Err(format!("expected InvalidName for {name:?}, got: {e}")),
        }
    }
    Ok(())
}

async fn no_fields_returns_empty_form<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.save("Nothing", Vec::new()).await {
        Err(StorageError::EmptyForm) => Ok(()),
        Ok(_) => Err("empty field list was accepted".into()),
        Err(e) => Err(format!("expected EmptyForm, got: {e}")),
    }
}

async fn chained_derivation_returns_integrity<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let fields = vec![
        make_field("a", FieldType::Number),
        make_derived("b", "a", "value + 1"),
        make_derived("c", "b", "value + 1"),
    ];
    match s.save("Chain", fields).await {
        Err(StorageError::Integrity(errors)) => {
            let expected = IntegrityError::ChainedDerivation {
                field_id: "c".into(),
                parent_id: "b".into(),
            };
            if errors.contains(&expected) {
                Ok(())
            } else {
                Err(format!("expected ChainedDerivation for c, got {errors:?}"))
            }
        }
        Ok(_) => Err("chained derivation was accepted".into()),
        Err(e) => Err(format!("expected Integrity, got: {e}")),
    }
}

async fn get_unknown_id_returns_form_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.get("no-such-form").await {
        Err(StorageError::FormNotFound { id }) if id == "no-such-form" => Ok(()),
        Err(StorageError::FormNotFound { id }) => Err(format!("error carries wrong id: {id}")),
        Ok(_) => Err("unknown id returned a form".into()),
        Err(e) => Err(format!("expected FormNotFound, got: {e}")),
    }
}

async fn delete_unknown_id_returns_form_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.save("Keep", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    match s.delete("no-such-form").await {
        Err(StorageError::FormNotFound { .. }) => {}
        Ok(()) => return Err("deleting an unknown id succeeded".into()),
        Err(e) => return Err(format!("expected FormNotFound, got: {e}")),
    }
    let all = s.list_all().await.map_err(|e| e.to_string())?;
    if all.len() != 1 {
        return Err(format!("failed delete changed the store: {} form(s)", all.len()));
    }
    Ok(())
}

async fn rejected_save_stores_nothing<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let _ = s.save("", sample_fields()).await;
    let _ = s.save("Nothing", Vec::new()).await;
    let _ = s
        .save("Orphan", vec![make_derived("x", "missing", "value")])
        .await;
    let all = s.list_all().await.map_err(|e| e.to_string())?;
    if !all.is_empty() {
        return Err(format!("rejected saves left {} form(s)", all.len()));
    }
    Ok(())
}
