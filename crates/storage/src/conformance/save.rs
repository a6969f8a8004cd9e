use std::future::Future;

use super::{make_field, sample_fields, TestResult};
use crate::FormStore;
use formwright_core::FieldType;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub(super) async fn run_save_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "save",
            "save_assigns_id_and_equal_timestamps",
            save_assigns_id_and_equal_timestamps(factory).await,
        ),
        TestResult::from_result(
            "save",
            "save_trims_name",
            save_trims_name(factory).await,
        ),
        TestResult::from_result(
            "save",
            "save_same_name_replaces_fields",
            save_same_name_replaces_fields(factory).await,
        ),
        TestResult::from_result(
            "save",
            "save_same_name_keeps_id_and_created_at",
            save_same_name_keeps_id_and_created_at(factory).await,
        ),
        TestResult::from_result(
            "save",
            "distinct_names_get_distinct_ids",
            distinct_names_get_distinct_ids(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

async fn save_assigns_id_and_equal_timestamps<S, F, Fut>(factory: &F) -> Result<(), String>
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
    if saved.id.is_empty() {
        return Err("saved form has an empty id".into());
    }
    if saved.created_at != saved.updated_at {
        return Err(format!(
            "new form: createdAt {} != updatedAt {}",
            saved.created_at, saved.updated_at
        ));
    }
    if saved.name != "Signup" {
        return Err(format!("expected name 'Signup', got '{}'", saved.name));
    }
    Ok(())
}

async fn save_trims_name<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let first = s
        .save("  Signup \t", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    if first.name != "Signup" {
        return Err(format!("expected trimmed name, got {:?}", first.name));
    }
    let second = s
        .save("Signup", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    if second.id != first.id {
        return Err("padded and unpadded names should be the same form".into());
    }
    let all = s.list_all().await.map_err(|e| e.to_string())?;
    if all.len() != 1 {
        return Err(format!("expected 1 form, got {}", all.len()));
    }
    Ok(())
}

async fn save_same_name_replaces_fields<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.save("Signup", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    let replacement = vec![make_field("only", FieldType::Textarea)];
    let saved = s
        .save("Signup", replacement.clone())
        .await
        .map_err(|e| e.to_string())?;
    let fetched = s.get(&saved.id).await.map_err(|e| e.to_string())?;
    if fetched.fields != replacement {
        return Err(format!(
            "expected replaced fields, got {} field(s)",
            fetched.fields.len()
        ));
    }
    Ok(())
}

async fn save_same_name_keeps_id_and_created_at<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let first = s
        .save("Signup", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    let second = s
        .save("Signup", sample_fields())
        .await
        .map_err(|e| e.to_string())?;
    if second.id != first.id {
        return Err(format!("id changed from {} to {}", first.id, second.id));
    }
    if second.created_at != first.created_at {
        return Err("createdAt changed on resave".into());
    }
    let parse = |s: &str| OffsetDateTime::parse(s, &Rfc3339).map_err(|e| format!("{s}: {e}"));
    if parse(&second.updated_at)? < parse(&first.updated_at)? {
        return Err(format!(
            "updatedAt went backwards: {} -> {}",
            first.updated_at, second.updated_at
        ));
    }
    Ok(())
}

async fn distinct_names_get_distinct_ids<S, F, Fut>(factory: &F) -> Result<(), String>
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
    if a.id == b.id {
        return Err("two names share one id".into());
    }
    Ok(())
}
