/// Shown under a chart when the backend sent no insight.
pub const NO_INSIGHT_PLACEHOLDER: &str = "No insight available.";

/// How the insight block under a chart is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightView<'a> {
    /// One bullet per line, verbatim.
    Bullets(Vec<&'a str>),
    Placeholder,
}

impl<'a> InsightView<'a> {
    /// Splits the insight text on newlines; no reflow, no trimming.
    pub fn from_text(insight: Option<&'a str>) -> Self {
        match insight {
            Some(text) if !text.is_empty() => Self::Bullets(text.split('\n').collect()),
            _ => Self::Placeholder,
        }
    }
}
