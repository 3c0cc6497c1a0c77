use crate::core::rows::normalize_json_rows;
use crate::domain::model::RowBatch;
use crate::utils::error::{Result, ScrapeError};
use serde_json::Value;

/// 接受三種形狀：`{"results": [...]}`、單一物件、物件陣列
pub fn parse_json_rows(text: &str) -> Result<RowBatch> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|e| ScrapeError::malformed(format!("Response was not valid JSON: {}", e)))?;

    let candidates = match parsed {
        Value::Object(mut obj) => {
            if matches!(obj.get("results"), Some(Value::Array(_))) {
                match obj.remove("results") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                }
            } else {
                vec![Value::Object(obj)]
            }
        }
        Value::Array(items) => items,
        _ => {
            return Err(ScrapeError::malformed(
                "JSON payload was not a list or object",
            ))
        }
    };

    normalize_json_rows(candidates)
}
