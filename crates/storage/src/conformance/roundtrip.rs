use std::future::Future;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::{make_derived, make_field, TestResult};
use crate::FormStore;
use formwright_core::{FieldType, FieldValue};

pub(super) async fn run_roundtrip_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "roundtrip",
            "every_field_attribute_survives",
            every_field_attribute_survives(factory).await,
        ),
        TestResult::from_result(
            "roundtrip",
            "absent_parent_stays_absent",
            absent_parent_stays_absent(factory).await,
        ),
        TestResult::from_result(
            "roundtrip",
            "field_order_preserved",
            field_order_preserved(factory).await,
        ),
        TestResult::from_result(
            "roundtrip",
            "long_decimals_keep_every_digit",
            long_decimals_keep_every_digit(factory).await,
        ),
    ]
}

async fn every_field_attribute_survives<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;

    let mut email = make_field("email", FieldType::Text);
    email.required = true;
    email.default_value = FieldValue::from("someone@example.com");
    email.validation.email = true;
    email.validation.min_length = Some(5);
    email.validation.max_length = Some(120);

    let mut qty = make_field("qty", FieldType::Number);
    qty.default_value = FieldValue::Number(Decimal::new(15, 1));
    qty.validation.min = Some(Decimal::new(-5, 1));
    qty.validation.max = Some(Decimal::from(100));

    let mut size = make_field("size", FieldType::Radio);
    size.options = vec!["S".into(), "M".into(), "L".into()];

    let mut agree = make_field("agree", FieldType::Checkbox);
    agree.default_value = FieldValue::Bool(true);

    let fields = vec![
        email,
        qty,
        make_derived("double", "qty", "value * 2"),
        size,
        agree,
    ];
    let saved = s
        .save("Everything", fields.clone())
        .await
        .map_err(|e| e.to_string())?;
    let fetched = s.get(&saved.id).await.map_err(|e| e.to_string())?;
    for (want, got) in fields.iter().zip(&fetched.fields) {
        if want != got {
            return Err(format!("field {} changed: {want:?} -> {got:?}", want.id));
        }
    }
    if fetched.fields.len() != fields.len() {
        return Err(format!(
            "expected {} fields, got {}",
            fields.len(),
            fetched.fields.len()
        ));
    }
    Ok(())
}

async fn absent_parent_stays_absent<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let saved = s
        .save("Plain", vec![make_field("plain", FieldType::Number)])
        .await
        .map_err(|e| e.to_string())?;
    let listed = s.list_all().await.map_err(|e| e.to_string())?;
    let field = listed
        .iter()
        .find(|f| f.id == saved.id)
        .and_then(|f| f.fields.first())
        .ok_or("saved form missing from list")?;
    if field.derived_from.is_some() {
        return Err(format!("derivedFrom became {:?}", field.derived_from));
    }
    Ok(())
}

async fn field_order_preserved<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let ids = ["c", "a", "b"];
    let fields = ids.iter().map(|id| make_field(id, FieldType::Text)).collect();
    let saved = s
        .save("Ordered", fields)
        .await
        .map_err(|e| e.to_string())?;
    let fetched = s.get(&saved.id).await.map_err(|e| e.to_string())?;
    let got: Vec<&str> = fetched.fields.iter().map(|f| f.id.as_str()).collect();
    if got != ids {
        return Err(format!("unexpected field order: {got:?}"));
    }
    Ok(())
}

async fn long_decimals_keep_every_digit<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let min = Decimal::from_str("0.12345678901234567891").map_err(|e| e.to_string())?;
    let default = Decimal::from_str("12345678901234567890.5").map_err(|e| e.to_string())?;

    let mut amount = make_field("amount", FieldType::Number);
    amount.default_value = FieldValue::Number(default);
    amount.validation.min = Some(min);
    let saved = s
        .save("Precise", vec![amount])
        .await
        .map_err(|e| e.to_string())?;
    let fetched = s.get(&saved.id).await.map_err(|e| e.to_string())?;
    let field = fetched.fields.first().ok_or("saved field missing")?;
    if field.default_value != FieldValue::Number(default) {
        return Err(format!("defaultValue changed: {:?}", field.default_value));
    }
    if field.validation.min != Some(min) {
        return Err(format!("min changed: {:?}", field.validation.min));
    }
    Ok(())
}
