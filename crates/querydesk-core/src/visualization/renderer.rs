use super::binder::ChartSpec;

/// Draws a chart from a fully bound [`ChartSpec`].
///
/// Pixel or terminal output lives outside the core; front ends implement this.
pub trait ChartRenderer {
    type Output;

    fn render(&self, spec: &ChartSpec<'_>) -> Self::Output;
}
