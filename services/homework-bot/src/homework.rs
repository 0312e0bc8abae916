//! Homework API payload shape checks

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One status change reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub homework_name: String,
    pub status: String,
}

impl SubmissionRecord {
    /// Read a record out of an untrusted `homeworks` entry
    pub fn from_value(value: &Value) -> crate::Result<Self> {
        Self::deserialize(value).map_err(|e| {
            crate::HomeworkBotError::MalformedResponse(format!("invalid homework entry: {}", e))
        })
    }
}

/// Check the payload is an object with a `homeworks` array and return that
/// array in the order the API sent it.
pub fn validate(payload: Value) -> crate::Result<Vec<Value>> {
    let mut fields = match payload {
        Value::Object(fields) => fields,
        other => {
            return Err(crate::HomeworkBotError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            )))
        }
    };

    match fields.remove("homeworks") {
        Some(Value::Array(homeworks)) => Ok(homeworks),
        Some(other) => Err(crate::HomeworkBotError::MalformedResponse(format!(
            "'homeworks' is {}, expected an array",
            type_name(&other)
        ))),
        None => Err(crate::HomeworkBotError::MalformedResponse(
            "response has no 'homeworks' key".to_string(),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
