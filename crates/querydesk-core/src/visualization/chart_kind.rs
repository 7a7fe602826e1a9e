use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The chart kinds a result can be drawn as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Pie,
}

/// Phrases scanned for in the question, in precedence order.
const CHART_PHRASES: [(&str, ChartKind); 4] = [
    ("pie chart", ChartKind::Pie),
    ("bar chart", ChartKind::Bar),
    ("line chart", ChartKind::Line),
    ("area chart", ChartKind::Area),
];

impl ChartKind {
    /// Detects the chart kind a question asks for.
    ///
    /// Plain phrase match on the lower-cased text: the first of "pie chart",
    /// "bar chart", "line chart", "area chart" that occurs wins.
    pub fn detect(question: &str) -> Option<Self> {
        let lower = question.to_lowercase();
        CHART_PHRASES
            .iter()
            .find(|(phrase, _)| lower.contains(phrase))
            .map(|(_, kind)| *kind)
    }

    /// Whether the x field names slices rather than an axis.
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Pie)
    }
}
