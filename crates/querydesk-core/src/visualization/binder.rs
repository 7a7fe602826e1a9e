//! Result-to-chart mapping.
//!
//! Decides whether a result message gets a chart section, exposes its axis
//! choices, applies user selections through the session store, and builds the
//! [`ChartSpec`] handed to a renderer once both axes are chosen. Selecting an axis
//! only reinterprets rows that were already fetched.

use super::chart_kind::ChartKind;
use crate::session::{Axis, QueryResult, Row, SessionStore};
use serde_json::Value;

/// Fixed series/segment colors, assigned cyclically by position.
pub const CHART_PALETTE: [&str; 4] = ["#8884d8", "#82ca9d", "#ffc658", "#ff8042"];

/// Whether a result gets a chart section at all.
///
/// Requires the backend's plotable flag, a chart kind named in the question and
/// at least two columns.
pub fn is_chart_eligible(result: &QueryResult) -> bool {
    result.plotable && result.requested_chart_kind.is_some() && result.columns.len() >= 2
}

/// Choices offered for either axis slot, or `None` when there is no chart section.
pub fn axis_options(result: &QueryResult) -> Option<&[String]> {
    is_chart_eligible(result).then_some(result.columns.as_slice())
}

/// Chart section state of a result message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartState<'a> {
    /// No chart section is shown.
    Hidden,
    /// Section shown with axis selectors; the listed axes are still unset.
    AwaitingAxes {
        kind: ChartKind,
        missing: Vec<Axis>,
    },
    /// Both axes chosen; the chart can be drawn.
    Ready(ChartSpec<'a>),
}

/// Computes the chart section state for a result.
pub fn chart_state(result: &QueryResult) -> ChartState<'_> {
    let Some(kind) = result.requested_chart_kind.filter(|_| is_chart_eligible(result)) else {
        return ChartState::Hidden;
    };
    match ChartSpec::from_result(result) {
        Some(spec) => ChartState::Ready(spec),
        None => ChartState::AwaitingAxes {
            kind,
            missing: [Axis::X, Axis::Y]
                .into_iter()
                .filter(|axis| result.axis_field(*axis).is_none())
                .collect(),
        },
    }
}

/// Outcome of a user axis selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSelection {
    /// Stored on the message.
    Applied,
    /// The addressed message does not exist or is not a result.
    MessageNotFound,
    /// The result has no chart section.
    NotEligible,
    /// The value is not one of the result's columns.
    OutsideDomain,
}

/// Applies a user axis pick to the result at `thread_index`/`message_index`.
///
/// `None` clears the slot. Values must be one of the result's columns.
pub fn select_axis(
    store: &mut SessionStore,
    thread_index: usize,
    message_index: usize,
    axis: Axis,
    value: Option<String>,
) -> AxisSelection {
    let Some(result) = store
        .thread(thread_index)
        .and_then(|thread| thread.messages.get(message_index))
        .and_then(|message| message.as_result())
    else {
        return AxisSelection::MessageNotFound;
    };

    let Some(options) = axis_options(result) else {
        return AxisSelection::NotEligible;
    };
    if let Some(column) = &value {
        if !options.iter().any(|option| option == column) {
            tracing::debug!("Rejected axis value '{}' outside result columns", column);
            return AxisSelection::OutsideDomain;
        }
    }

    if store.mutate_message_axis(thread_index, message_index, axis, value) {
        AxisSelection::Applied
    } else {
        AxisSelection::MessageNotFound
    }
}

/// Everything a renderer needs to draw one chart.
///
/// For `Pie`, `x_field` names the slices and `y_field` their magnitude; for the
/// other kinds `x_field` is the independent axis and `y_field` the series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec<'a> {
    pub kind: ChartKind,
    pub rows: &'a [Row],
    pub x_field: &'a str,
    pub y_field: &'a str,
    pub palette: &'static [&'static str],
}

/// One plotted datum.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    /// `None` when the y cell is missing or not numeric.
    pub value: Option<f64>,
    pub color: &'static str,
}

impl<'a> ChartSpec<'a> {
    /// Builds the chart spec if the result is eligible and both axes are selected.
    pub fn from_result(result: &'a QueryResult) -> Option<Self> {
        if !is_chart_eligible(result) {
            return None;
        }
        Some(Self {
            kind: result.requested_chart_kind?,
            rows: &result.rows,
            x_field: result.x_axis_field.as_deref()?,
            y_field: result.y_axis_field.as_deref()?,
            palette: &CHART_PALETTE,
        })
    }

    /// Line/bar/area stroke color.
    pub fn series_color(&self) -> &'static str {
        self.palette[0]
    }

    /// Area fill color.
    pub fn fill_color(&self) -> &'static str {
        self.palette[1 % self.palette.len()]
    }

    /// Projects the rows onto the selected axes.
    ///
    /// Pie slices cycle through the palette; every other kind uses the series color.
    pub fn points(&self) -> Vec<ChartPoint> {
        self.rows
            .iter()
            .enumerate()
            .map(|(position, row)| ChartPoint {
                label: row.get(self.x_field).map(cell_label).unwrap_or_default(),
                value: row.get(self.y_field).and_then(cell_number),
                color: if self.kind.is_categorical() {
                    self.palette[position % self.palette.len()]
                } else {
                    self.series_color()
                },
            })
            .collect()
    }
}

fn cell_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cell_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Message;
    use crate::test_support::empty_store;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        vec![
            json!({"region": "north", "sales": 10}),
            json!({"region": "south", "sales": "7.5"}),
            json!({"region": "east", "sales": null}),
            json!({"region": "west", "sales": 4}),
            json!({"region": "central", "sales": 1}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    fn result(kind: Option<ChartKind>, columns: Vec<&str>) -> QueryResult {
        QueryResult::new(
            "SELECT region, sales FROM sales",
            Some(columns.into_iter().map(String::from).collect()),
            rows(),
            true,
            kind,
            None,
        )
    }

    fn store_with(result: QueryResult) -> SessionStore {
        let mut store = empty_store();
        store.append_message(0, Message::user("q"));
        store.append_message(0, Message::Result(result));
        store
    }

    #[test]
    fn test_eligible_with_two_columns() {
        assert!(is_chart_eligible(&result(Some(ChartKind::Bar), vec!["x", "y"])));
    }

    #[test]
    fn test_not_eligible_with_one_column() {
        assert!(!is_chart_eligible(&result(Some(ChartKind::Bar), vec!["x"])));
    }

    #[test]
    fn test_not_eligible_without_kind_or_plotable() {
        assert!(!is_chart_eligible(&result(None, vec!["x", "y"])));

        let mut not_plotable = result(Some(ChartKind::Bar), vec!["x", "y"]);
        not_plotable.plotable = false;
        assert!(!is_chart_eligible(&not_plotable));
        assert!(axis_options(&not_plotable).is_none());
    }

    #[test]
    fn test_chart_state_progression() {
        let mut r = result(Some(ChartKind::Line), vec!["region", "sales"]);
        assert_eq!(
            chart_state(&r),
            ChartState::AwaitingAxes {
                kind: ChartKind::Line,
                missing: vec![Axis::X, Axis::Y]
            }
        );

        r.set_axis_field(Axis::X, Some("region".into()));
        assert_eq!(
            chart_state(&r),
            ChartState::AwaitingAxes {
                kind: ChartKind::Line,
                missing: vec![Axis::Y]
            }
        );

        r.set_axis_field(Axis::Y, Some("sales".into()));
        assert!(matches!(chart_state(&r), ChartState::Ready(_)));
        assert_eq!(chart_state(&result(None, vec!["a", "b"])), ChartState::Hidden);
    }

    #[test]
    fn test_select_axis_applies_and_validates_domain() {
        let mut store = store_with(result(Some(ChartKind::Bar), vec!["region", "sales"]));

        assert_eq!(
            select_axis(&mut store, 0, 1, Axis::X, Some("profit".into())),
            AxisSelection::OutsideDomain
        );
        assert_eq!(
            select_axis(&mut store, 0, 1, Axis::X, Some("region".into())),
            AxisSelection::Applied
        );
        assert_eq!(
            select_axis(&mut store, 0, 0, Axis::X, Some("region".into())),
            AxisSelection::MessageNotFound
        );

        let stored = store.active_thread().messages[1].as_result().unwrap();
        assert_eq!(stored.x_axis_field.as_deref(), Some("region"));
        assert!(stored.y_axis_field.is_none());
    }

    #[test]
    fn test_select_axis_refused_without_chart_section() {
        let mut store = store_with(result(None, vec!["region", "sales"]));
        assert_eq!(
            select_axis(&mut store, 0, 1, Axis::Y, Some("sales".into())),
            AxisSelection::NotEligible
        );
    }

    #[test]
    fn test_bar_points_use_series_color_and_parse_numbers() {
        let mut r = result(Some(ChartKind::Bar), vec!["region", "sales"]);
        r.set_axis_field(Axis::X, Some("region".into()));
        r.set_axis_field(Axis::Y, Some("sales".into()));
        let spec = ChartSpec::from_result(&r).unwrap();

        let points = spec.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].label, "north");
        assert_eq!(points[0].value, Some(10.0));
        assert_eq!(points[1].value, Some(7.5));
        assert_eq!(points[2].value, None);
        assert!(points.iter().all(|p| p.color == "#8884d8"));
        assert_eq!(spec.fill_color(), "#82ca9d");
    }

    #[test]
    fn test_pie_points_cycle_palette() {
        let mut r = result(Some(ChartKind::Pie), vec!["region", "sales"]);
        r.set_axis_field(Axis::X, Some("region".into()));
        r.set_axis_field(Axis::Y, Some("sales".into()));
        let spec = ChartSpec::from_result(&r).unwrap();

        let colors: Vec<_> = spec.points().iter().map(|p| p.color).collect();
        assert_eq!(
            colors,
            vec!["#8884d8", "#82ca9d", "#ffc658", "#ff8042", "#8884d8"]
        );
    }
}
