//! Conversation message types.
//!
//! A thread is a sequence of [`Message`]s: the user's question, then either a
//! tabular query result or an error reported by the backend.

use crate::visualization::ChartKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row, keyed by column name.
///
/// Key order is the order the backend sent (serde_json `preserve_order`).
pub type Row = Map<String, Value>;

/// One turn in a conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// A question typed by the user.
    User { text: String },
    /// A successful backend answer.
    Result(QueryResult),
    /// A failed request, carrying a human-readable reason.
    Error { text: String },
}

impl Message {
    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    /// Creates an assistant error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Returns the query result if this is a result message.
    pub fn as_result(&self) -> Option<&QueryResult> {
        match self {
            Self::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_result_mut(&mut self) -> Option<&mut QueryResult> {
        match self {
            Self::Result(result) => Some(result),
            _ => None,
        }
    }
}

/// Which chart axis a user selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Independent axis, or the category dimension of a pie chart.
    X,
    /// Dependent series, or the magnitude dimension of a pie chart.
    Y,
}

/// The tabular answer to a question, plus its visualization metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// SQL generated by the backend.
    pub sql_text: String,
    /// Column order used for tables, exports and axis choices.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Backend-asserted flag that the rows can be charted.
    #[serde(default)]
    pub plotable: bool,
    /// Chart kind named in the question, if any.
    #[serde(default)]
    pub requested_chart_kind: Option<ChartKind>,
    #[serde(default)]
    pub insight_text: Option<String>,
    #[serde(default)]
    pub x_axis_field: Option<String>,
    #[serde(default)]
    pub y_axis_field: Option<String>,
}

impl QueryResult {
    /// Builds a result with unset axis fields.
    ///
    /// `columns` falls back to the first row's keys when absent or empty.
    pub fn new(
        sql_text: impl Into<String>,
        columns: Option<Vec<String>>,
        rows: Vec<Row>,
        plotable: bool,
        requested_chart_kind: Option<ChartKind>,
        insight_text: Option<String>,
    ) -> Self {
        let columns = resolve_columns(columns, &rows);
        Self {
            sql_text: sql_text.into(),
            columns,
            rows,
            plotable,
            requested_chart_kind,
            insight_text: insight_text.filter(|text| !text.is_empty()),
            x_axis_field: None,
            y_axis_field: None,
        }
    }

    pub fn axis_field(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::X => self.x_axis_field.as_deref(),
            Axis::Y => self.y_axis_field.as_deref(),
        }
    }

    pub fn set_axis_field(&mut self, axis: Axis, value: Option<String>) {
        match axis {
            Axis::X => self.x_axis_field = value,
            Axis::Y => self.y_axis_field = value,
        }
    }
}

/// Returns the explicit column list, or the key set of the first row.
pub fn resolve_columns(columns: Option<Vec<String>>, rows: &[Row]) -> Vec<String> {
    match columns {
        Some(columns) if !columns.is_empty() => columns,
        _ => rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_resolve_columns_prefers_explicit_list() {
        let rows = vec![row(json!({"a": 1, "b": 2}))];
        let columns = resolve_columns(Some(vec!["b".into(), "a".into()]), &rows);
        assert_eq!(columns, vec!["b", "a"]);
    }

    #[test]
    fn test_resolve_columns_derives_from_first_row_in_key_order() {
        let rows = vec![
            row(json!({"region": "north", "sales": 10, "orders": 3})),
            row(json!({"other": 1})),
        ];
        assert_eq!(
            resolve_columns(None, &rows),
            vec!["region", "sales", "orders"]
        );
        assert_eq!(
            resolve_columns(Some(vec![]), &rows),
            vec!["region", "sales", "orders"]
        );
    }

    #[test]
    fn test_resolve_columns_without_rows_is_empty() {
        assert!(resolve_columns(None, &[]).is_empty());
    }

    #[test]
    fn test_new_result_has_unset_axes_and_drops_empty_insight() {
        let result = QueryResult::new("SELECT 1", None, vec![], true, None, Some(String::new()));
        assert!(result.x_axis_field.is_none());
        assert!(result.y_axis_field.is_none());
        assert!(result.insight_text.is_none());
    }

    #[test]
    fn test_message_serializes_with_type_tag() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, json!({"type": "user", "text": "hi"}));

        let value = serde_json::to_value(Message::error("boom")).unwrap();
        assert_eq!(value["type"], "error");
    }

    #[test]
    fn test_result_message_roundtrips_through_json() {
        let mut result = QueryResult::new(
            "SELECT region, sales FROM t",
            None,
            vec![row(json!({"region": "north", "sales": 10}))],
            true,
            Some(ChartKind::Bar),
            Some("North leads".into()),
        );
        result.set_axis_field(Axis::X, Some("region".into()));
        let message = Message::Result(result);

        let json = serde_json::to_string(&message).unwrap();
        let restored: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, message);
        assert_eq!(restored.as_result().unwrap().axis_field(Axis::X), Some("region"));
    }
}
