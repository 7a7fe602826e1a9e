//! Visualization binding.
//!
//! - `chart_kind`: chart kinds and question-text detection (`ChartKind`)
//! - `binder`: chart eligibility, axis selection and chart specs
//! - `insight`: insight bullet rendering (`InsightView`)
//! - `renderer`: render boundary (`ChartRenderer`)

mod binder;
mod chart_kind;
mod insight;
mod renderer;

pub use binder::{
    AxisSelection, CHART_PALETTE, ChartPoint, ChartSpec, ChartState, axis_options, chart_state,
    is_chart_eligible, select_axis,
};
pub use chart_kind::ChartKind;
pub use insight::{InsightView, NO_INSIGHT_PLACEHOLDER};
pub use renderer::ChartRenderer;
