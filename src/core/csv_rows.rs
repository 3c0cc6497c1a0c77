use crate::core::rows::normalize_csv_record;
use crate::domain::model::RowBatch;
use crate::utils::error::{Result, ScrapeError};
use csv::ReaderBuilder;

/// 第一行為表頭，其餘每行一列
pub fn parse_csv_rows(text: &str) -> Result<RowBatch> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ScrapeError::malformed(format!("CSV header could not be read: {}", e)))?
        .clone();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ScrapeError::malformed("CSV payload missing headers"));
    }

    let mut rows = RowBatch::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ScrapeError::malformed(format!("Invalid CSV record: {}", e)))?;
        rows.push(normalize_csv_record(&headers, &record)?);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_one_line() {
        let rows = parse_csv_rows("a,b\n1,2\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_csv_rows("rk,nm,ti\r\n1,\"Gorski, Krys\",48.92\r\n").unwrap();
        assert_eq!(rows[0].get("nm"), Some("Gorski, Krys"));
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let rows = parse_csv_rows("rk,nm,ti\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_header_is_malformed() {
        assert!(matches!(
            parse_csv_rows(""),
            Err(ScrapeError::MalformedPayload { .. })
        ));
    }
}
