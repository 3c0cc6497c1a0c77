use crate::domain::model::ResultRow;
use crate::utils::error::Result;
use std::io::Write;

/// 依列的順序記錄第一次出現的欄位名稱
pub fn column_order(rows: &[ResultRow]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

/// 寫出 CSV：表頭即欄位聯集，列中缺少的欄位寫空字串。
/// 沒有任何欄位時（空批次或全為空列）不輸出任何內容，連表頭也沒有。
pub fn write_csv<W: Write>(rows: &[ResultRow], writer: W) -> Result<()> {
    let columns = column_order(rows);
    if columns.is_empty() {
        return Ok(());
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&columns)?;
    for row in rows {
        wtr.write_record(columns.iter().map(|c| row.get(c).unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(rows: &[ResultRow]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::csv_rows::parse_csv_rows;

    fn row(pairs: &[(&str, &str)]) -> ResultRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_column_order_is_first_seen() {
        let rows = vec![
            row(&[("rk", "1"), ("nm", "A")]),
            row(&[("rk", "2"), ("sh", "Y"), ("nm", "B")]),
            row(&[("ct", "MA")]),
        ];
        assert_eq!(column_order(&rows), vec!["rk", "nm", "sh", "ct"]);
    }

    #[test]
    fn test_heterogeneous_rows_fill_blanks() {
        let rows = vec![row(&[("rk", "1"), ("nm", "A")]), row(&[("rk", "2"), ("sh", "Y")])];
        let text = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        assert_eq!(text, "rk,nm,sh\n1,A,\n2,,Y\n");
    }

    #[test]
    fn test_output_reparses_to_same_values() {
        let rows = vec![
            row(&[("rk", "1"), ("nm", "Gorski, Krys"), ("ti", "48.92")]),
            row(&[("rk", "2"), ("st", "\"DQ\"")]),
        ];
        let text = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        let reparsed = parse_csv_rows(&text).unwrap();
        let columns = column_order(&rows);

        assert_eq!(reparsed.len(), rows.len());
        for (original, back) in rows.iter().zip(&reparsed) {
            for column in &columns {
                assert_eq!(original.get(column).unwrap_or(""), back.get(column).unwrap());
            }
        }
    }

    #[test]
    fn test_empty_batch_writes_nothing() {
        assert!(to_csv_bytes(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_field_less_rows_write_nothing() {
        let rows = vec![ResultRow::new(), ResultRow::new()];
        assert!(column_order(&rows).is_empty());
        assert!(to_csv_bytes(&rows).unwrap().is_empty());
    }
}
