pub mod employer;
pub mod vacancy;

use serde_json::Value;

use crate::error::AppError;

/// Walk `path` through nested objects and return the string at the end.
fn required_str(
    raw: &Value,
    path: &[&str],
    record: &'static str,
    field: &'static str,
) -> Result<String, AppError> {
    path.iter()
        .try_fold(raw, |value, key| value.get(key))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or(AppError::MissingField { record, field })
}

/// External ids arrive as strings; numeric ids are kept as their decimal text.
fn required_id(raw: &Value, record: &'static str) -> Result<String, AppError> {
    match raw.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(AppError::MissingField { record, field: "id" }),
    }
}

fn required_i32(raw: &Value, key: &'static str, record: &'static str) -> Result<i32, AppError> {
    raw.get(key)
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or(AppError::MissingField { record, field: key })
}
