//! Terminal rendering of messages, tables and charts.

use colored::{ColoredString, Colorize};
use querydesk_core::session::{Message, QueryResult, Row};
use querydesk_core::visualization::{
    ChartKind, ChartRenderer, ChartSpec, ChartState, InsightView, NO_INSIGHT_PLACEHOLDER, chart_state,
};
use serde_json::Value;

const MAX_CELL_WIDTH: usize = 30;
const MAX_LABEL_WIDTH: usize = 20;
const MAX_TABLE_ROWS: usize = 20;
const NOT_PLOTTED: &str = "(n/a)";

/// Draws charts as horizontal bars, one row per data point.
#[derive(Debug, Clone, Copy)]
pub struct TextChartRenderer {
    width: usize,
    color: bool,
}

impl TextChartRenderer {
    pub fn new(width: usize) -> Self {
        Self { width, color: true }
    }

    /// Renderer without ANSI colors.
    pub fn plain(width: usize) -> Self {
        Self {
            width,
            color: false,
        }
    }

    fn paint(&self, text: String, hex: &str) -> String {
        match (self.color, hex_rgb(hex)) {
            (true, Some((r, g, b))) => text.truecolor(r, g, b).to_string(),
            _ => text,
        }
    }

    fn bar(&self, kind: ChartKind, value: f64, max: f64) -> String {
        let len = if max > 0.0 {
            ((value.max(0.0) / max) * self.width as f64).round() as usize
        } else {
            0
        };
        match kind {
            ChartKind::Line => format!("{}●", " ".repeat(len.saturating_sub(1))),
            ChartKind::Area => "▒".repeat(len),
            ChartKind::Bar | ChartKind::Pie => "█".repeat(len),
        }
    }
}

impl ChartRenderer for TextChartRenderer {
    type Output = Vec<String>;

    fn render(&self, spec: &ChartSpec<'_>) -> Vec<String> {
        let points = spec.points();
        let label_width = points
            .iter()
            .map(|p| p.label.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH);

        let mut lines = vec![match spec.kind {
            ChartKind::Pie => format!("{} by {}", spec.y_field, spec.x_field),
            _ => format!("{} over {}", spec.y_field, spec.x_field),
        }];

        if spec.kind == ChartKind::Pie {
            let total: f64 = points.iter().filter_map(|p| p.value).filter(|v| *v > 0.0).sum();
            for point in &points {
                let label = pad(&point.label, label_width);
                lines.push(match point.value {
                    Some(value) if total > 0.0 && value > 0.0 => {
                        let share = value / total * 100.0;
                        let bar = self.paint(self.bar(spec.kind, share, 100.0), point.color);
                        format!("{} │{} {:.1}% ({})", label, bar, share, format_number(value))
                    }
                    _ => format!("{} │ {}", label, NOT_PLOTTED),
                });
            }
        } else {
            let max = points
                .iter()
                .filter_map(|p| p.value)
                .fold(0.0_f64, f64::max);
            for point in &points {
                let label = pad(&point.label, label_width);
                lines.push(match point.value {
                    Some(value) => {
                        let color = match spec.kind {
                            ChartKind::Area => spec.fill_color(),
                            _ => point.color,
                        };
                        let bar = self.paint(self.bar(spec.kind, value, max), color);
                        format!("{} │{} {}", label, bar, format_number(value))
                    }
                    None => format!("{} │ {}", label, NOT_PLOTTED),
                });
            }
        }
        lines
    }
}

fn pad(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{:<width$}", clipped, width = width)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Display text of one result cell.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Formats rows as an aligned text table projected through `columns`.
pub fn format_table(columns: &[String], rows: &[Row]) -> Vec<String> {
    if columns.is_empty() {
        return vec!["(no rows)".to_string()];
    }

    let shown = &rows[..rows.len().min(MAX_TABLE_ROWS)];
    let cells: Vec<Vec<String>> = shown
        .iter()
        .map(|row| columns.iter().map(|c| cell_text(row.get(c))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let join = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| pad(value, *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut lines = vec![
        join(columns),
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    ];
    lines.extend(cells.iter().map(|row| join(row)));
    if rows.len() > shown.len() {
        lines.push(format!("... {} more row(s)", rows.len() - shown.len()));
    }
    lines
}

fn heading(text: &str) -> ColoredString {
    text.bright_yellow().bold()
}

/// Prints one message of the active thread. `position` is 0-based.
pub fn print_message(position: usize, message: &Message, renderer: &TextChartRenderer) {
    let number = position + 1;
    match message {
        Message::User { text } => {
            println!("{}", format!("[{}] > {}", number, text).green());
        }
        Message::Error { text } => {
            println!("{}", format!("[{}] {}", number, text).red());
        }
        Message::Result(result) => print_result(number, result, renderer),
    }
    println!();
}

fn print_result(number: usize, result: &QueryResult, renderer: &TextChartRenderer) {
    println!("{}", format!("[{}]", number).bright_black());
    println!("{}", heading("📝 Generated SQL Query:"));
    println!("{}", result.sql_text.bright_blue());
    println!("{}", heading("📊 Query Results:"));
    for line in format_table(&result.columns, &result.rows) {
        println!("{}", line);
    }
    println!(
        "{}",
        format!("(/export {} to download as Excel)", number).bright_black()
    );

    match chart_state(result) {
        ChartState::Hidden => {}
        ChartState::AwaitingAxes { kind, missing } => {
            println!("{}", heading(&format!("📈 {} Chart", kind)));
            let missing: Vec<String> = missing
                .iter()
                .map(|axis| format!("{:?}", axis).to_lowercase())
                .collect();
            println!(
                "{}",
                format!(
                    "Select {} with /axis {} x|y <column>. Columns: {}",
                    missing.join(" and "),
                    number,
                    result.columns.join(", ")
                )
                .bright_black()
            );
        }
        ChartState::Ready(spec) => {
            println!("{}", heading(&format!("📈 {} Chart", spec.kind)));
            for line in renderer.render(&spec) {
                println!("{}", line);
            }
            println!("{}", heading("💡 Insight:"));
            match InsightView::from_text(result.insight_text.as_deref()) {
                InsightView::Bullets(lines) => {
                    for line in lines {
                        println!("  • {}", line);
                    }
                }
                InsightView::Placeholder => {
                    println!(
                        "  {}",
                        NO_INSIGHT_PLACEHOLDER.bright_black()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querydesk_core::session::{Axis, QueryResult};
    use serde_json::json;

    fn rows(values: Value) -> Vec<Row> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn charted(kind: ChartKind, data: Value) -> QueryResult {
        let mut result = QueryResult::new(
            "SELECT region, total FROM t",
            None,
            rows(data),
            true,
            Some(kind),
            None,
        );
        result.set_axis_field(Axis::X, Some("region".into()));
        result.set_axis_field(Axis::Y, Some("total".into()));
        result
    }

    #[test]
    fn test_bar_chart_scales_to_width() {
        let result = charted(
            ChartKind::Bar,
            json!([{"region": "north", "total": 10}, {"region": "south", "total": 5}]),
        );
        let spec = ChartSpec::from_result(&result).unwrap();

        let lines = TextChartRenderer::plain(10).render(&spec);

        assert_eq!(lines[0], "total over region");
        assert_eq!(lines[1], format!("north │{} 10", "█".repeat(10)));
        assert_eq!(lines[2], format!("south │{} 5", "█".repeat(5)));
    }

    #[test]
    fn test_pie_chart_shows_shares() {
        let result = charted(
            ChartKind::Pie,
            json!([{"region": "a", "total": 3}, {"region": "b", "total": 1}]),
        );
        let spec = ChartSpec::from_result(&result).unwrap();

        let lines = TextChartRenderer::plain(20).render(&spec);

        assert_eq!(lines[0], "total by region");
        assert!(lines[1].ends_with("75.0% (3)"));
        assert!(lines[2].ends_with("25.0% (1)"));
    }

    #[test]
    fn test_non_numeric_value_is_not_plotted() {
        let result = charted(
            ChartKind::Line,
            json!([{"region": "north", "total": "n/a"}, {"region": "south", "total": 2.5}]),
        );
        let spec = ChartSpec::from_result(&result).unwrap();

        let lines = TextChartRenderer::plain(4).render(&spec);

        assert_eq!(lines[1], "north │ (n/a)");
        assert_eq!(lines[2], "south │   ● 2.50");
    }

    #[test]
    fn test_table_projects_columns_and_truncates() {
        let columns = vec!["name".to_string(), "qty".to_string()];
        let data: Vec<Row> = (0..25)
            .map(|i| json!({"qty": i, "name": format!("item{}", i)}).as_object().cloned().unwrap())
            .collect();

        let lines = format_table(&columns, &data);

        assert_eq!(lines[0], "name   | qty");
        assert_eq!(lines[1], "-------+----");
        assert_eq!(lines[2], "item0  | 0  ");
        assert_eq!(lines.last().unwrap(), "... 5 more row(s)");
        assert_eq!(lines.len(), 2 + 20 + 1);
    }

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb("#8884d8"), Some((0x88, 0x84, 0xd8)));
        assert_eq!(hex_rgb("8884d8"), None);
        assert_eq!(hex_rgb("#fff"), None);
    }
}
