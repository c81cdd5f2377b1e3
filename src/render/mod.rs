mod description;
mod null_surface;

pub use description::{
    Annotation, AnnotationKind, Axis, AxisScale, ChartDescription, HIGHLIGHT_COLOR, HISTORY_COLOR,
    ImageExport, Layout, LineDash, LineStyle, MarkerStyle, REFERENCE_COLOR, Rgba, SurfaceConfig,
    Trace, TraceMode, TraceRole,
};
pub use null_surface::NullSurface;

use serde::{Deserialize, Serialize};

use crate::error::TrendsResult;

/// Outer pixel size of the drawn chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Partial style update applied to already-drawn traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRestyle {
    pub line_color: Rgba,
}

/// Contract implemented by whatever draws the chart.
///
/// The engine hands over complete descriptions and reads back only pixel
/// geometry it cannot know itself.
pub trait ChartSurface {
    fn render(&mut self, description: &ChartDescription) -> TrendsResult<()>;

    fn restyle(&mut self, trace_indices: &[usize], restyle: TraceRestyle) -> TrendsResult<()>;

    fn resize(&mut self) -> TrendsResult<()> {
        Ok(())
    }

    /// Angle in radians of the drawn trend-line segment, `NaN` when not drawn.
    fn query_rendered_trendline_angle(&self) -> f64;

    fn query_size(&self) -> Option<SurfaceSize>;
}

/// Angle of the first segment of an SVG path such as `M10,90L110,40`.
///
/// Uses screen coordinates (y grows downwards), matching what an SVG-backed
/// surface reports for a drawn line. Returns `NaN` for paths with fewer than
/// two points.
#[must_use]
pub fn angle_from_svg_path(path: &str) -> f64 {
    let coordinates: Vec<f64> = path
        .split(['M', 'L', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map_while(|part| part.parse::<f64>().ok())
        .take(4)
        .collect();
    match coordinates.as_slice() {
        [x1, y1, x2, y2] => (y2 - y1).atan2(x2 - x1),
        _ => f64::NAN,
    }
}
