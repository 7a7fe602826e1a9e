//! Spreadsheet export.
//!
//! [`export_to_spreadsheet`] builds a single in-memory [`Sheet`] from a result;
//! encoding it to a file is left to a [`SpreadsheetWriter`].

use crate::error::Result;
use crate::session::Row;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// File name of the exported artifact.
pub const EXPORT_FILE_NAME: &str = "query_results.xlsx";

/// Name of the single exported sheet.
pub const SHEET_NAME: &str = "Results";

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Text(n.to_string())),
            Value::String(s) => Cell::Text(s.clone()),
            // Nested values are written as their JSON text
            other => Cell::Text(other.to_string()),
        }
    }
}

/// A single named sheet: the header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

/// Builds the export sheet.
///
/// The first row is `columns` verbatim; each data row projects a result row
/// through `columns` in order, with missing keys left empty.
pub fn export_to_spreadsheet(rows: &[Row], columns: &[String]) -> Sheet {
    let header = columns.iter().map(|c| Cell::Text(c.clone())).collect();
    let body = rows.iter().map(|row| {
        columns
            .iter()
            .map(|column| row.get(column).map(Cell::from).unwrap_or(Cell::Empty))
            .collect()
    });

    Sheet {
        name: SHEET_NAME.to_string(),
        rows: std::iter::once(header).chain(body).collect(),
    }
}

/// Encodes a sheet into a downloadable file.
pub trait SpreadsheetWriter: Send + Sync {
    /// Writes `sheet` into `dir` under [`EXPORT_FILE_NAME`] and returns the file path.
    fn write(&self, sheet: &Sheet, dir: &Path) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_header_then_projected_rows() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let data = rows(vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": 4})]);

        let sheet = export_to_spreadsheet(&data, &columns);

        assert_eq!(sheet.name, "Results");
        assert_eq!(
            sheet.rows,
            vec![
                vec![Cell::Text("a".into()), Cell::Text("b".into())],
                vec![Cell::Number(1.0), Cell::Number(2.0)],
                vec![Cell::Number(3.0), Cell::Number(4.0)],
            ]
        );
    }

    #[test]
    fn test_projection_follows_column_order_and_fills_missing() {
        let columns = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        let data = rows(vec![json!({"a": "x", "b": true, "extra": 9})]);

        let sheet = export_to_spreadsheet(&data, &columns);

        assert_eq!(
            sheet.rows[1],
            vec![Cell::Bool(true), Cell::Empty, Cell::Text("x".into())]
        );
    }

    #[test]
    fn test_null_and_nested_values() {
        let columns = vec!["n".to_string(), "obj".to_string()];
        let data = rows(vec![json!({"n": null, "obj": {"k": 1}})]);

        let sheet = export_to_spreadsheet(&data, &columns);

        assert_eq!(sheet.rows[1][0], Cell::Empty);
        assert_eq!(sheet.rows[1][1], Cell::Text(r#"{"k":1}"#.into()));
    }

    #[test]
    fn test_empty_result_still_has_header() {
        let sheet = export_to_spreadsheet(&[], &["only".to_string()]);
        assert_eq!(sheet.rows.len(), 1);
    }
}
