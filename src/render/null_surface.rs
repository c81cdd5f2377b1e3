use crate::error::TrendsResult;
use crate::render::{ChartDescription, ChartSurface, SurfaceSize, TraceRestyle, TraceRole};

/// Recording surface used by tests and headless engine usage.
///
/// It validates every description it receives, keeps the last one, and
/// answers geometry queries from its public fields.
#[derive(Debug, Clone)]
pub struct NullSurface {
    pub last_description: Option<ChartDescription>,
    pub render_count: usize,
    pub resize_count: usize,
    pub restyles: Vec<(Vec<usize>, TraceRestyle)>,
    /// Angle reported while a trend trace is drawn.
    pub trendline_angle: f64,
    pub size: Option<SurfaceSize>,
}

impl Default for NullSurface {
    fn default() -> Self {
        Self {
            last_description: None,
            render_count: 0,
            resize_count: 0,
            restyles: Vec::new(),
            trendline_angle: f64::NAN,
            size: None,
        }
    }
}

impl NullSurface {
    #[must_use]
    pub fn with_trendline_angle(mut self, angle: f64) -> Self {
        self.trendline_angle = angle;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(SurfaceSize::new(width, height));
        self
    }
}

impl ChartSurface for NullSurface {
    fn render(&mut self, description: &ChartDescription) -> TrendsResult<()> {
        description.validate()?;
        self.last_description = Some(description.clone());
        self.render_count += 1;
        Ok(())
    }

    fn restyle(&mut self, trace_indices: &[usize], restyle: TraceRestyle) -> TrendsResult<()> {
        self.restyles.push((trace_indices.to_vec(), restyle));
        Ok(())
    }

    fn resize(&mut self) -> TrendsResult<()> {
        self.resize_count += 1;
        Ok(())
    }

    fn query_rendered_trendline_angle(&self) -> f64 {
        let drawn = self.last_description.as_ref().is_some_and(|description| {
            description
                .traces
                .last()
                .is_some_and(|trace| trace.role == TraceRole::TrendLine)
        });
        if drawn { self.trendline_angle } else { f64::NAN }
    }

    fn query_size(&self) -> Option<SurfaceSize> {
        self.size
    }
}
