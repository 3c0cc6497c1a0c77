use crate::domain::model::ResultRow;
use crate::utils::error::{Result, ScrapeError};
use serde_json::Value;

/// JSON 值轉為欄位字串：null 為空字串，巢狀結構保留為緊湊 JSON
fn value_to_field(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 確保候選列是物件；任一列不是物件就讓整批失敗
pub fn normalize_json_row(value: Value) -> Result<ResultRow> {
    match value {
        Value::Object(obj) => Ok(obj
            .into_iter()
            .map(|(key, value)| (key, value_to_field(value)))
            .collect()),
        other => Err(ScrapeError::malformed(format!(
            "Result row must be a mapping, got {}",
            json_kind(&other)
        ))),
    }
}

pub fn normalize_json_rows(items: Vec<Value>) -> Result<Vec<ResultRow>> {
    items.into_iter().map(normalize_json_row).collect()
}

/// 以表頭為鍵組成一列；缺少的尾端欄位補空字串，多出的欄位視為結構錯誤
pub fn normalize_csv_record(
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
) -> Result<ResultRow> {
    if record.len() > headers.len() {
        return Err(ScrapeError::malformed(format!(
            "CSV record has {} fields but header has {}",
            record.len(),
            headers.len()
        )));
    }

    Ok(headers
        .iter()
        .enumerate()
        .map(|(i, header)| (header, record.get(i).unwrap_or("")))
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
