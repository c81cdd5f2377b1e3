use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TrendsError, TrendsResult};

/// RGBA color in the `rgba(r, g, b, a)` notation charting surfaces accept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

impl Rgba {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Highlight for the hovered region and the current-day markers.
pub const HIGHLIGHT_COLOR: Rgba = Rgba::new(254, 52, 110, 1.0);
/// Faint default for history lines.
pub const HISTORY_COLOR: Rgba = Rgba::new(0, 0, 0, 0.15);
/// Reference lines (trend and threshold).
pub const REFERENCE_COLOR: Rgba = Rgba::new(114, 27, 101, 0.7);

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Rgba {
    type Error = TrendsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let inner = value
            .trim()
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| TrendsError::InvalidData(format!("`{value}` is not an rgba() color")))?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [red, green, blue, alpha] = parts.as_slice() else {
            return Err(TrendsError::InvalidData(format!(
                "`{value}` must have four rgba channels"
            )));
        };
        let channel = |text: &str| {
            text.parse::<u8>()
                .map_err(|e| TrendsError::InvalidData(format!("invalid color channel `{text}`: {e}")))
        };
        let alpha: f64 = alpha
            .parse()
            .map_err(|e| TrendsError::InvalidData(format!("invalid alpha `{alpha}`: {e}")))?;
        Ok(Self::new(channel(red)?, channel(green)?, channel(blue)?, alpha))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Log,
    Linear,
}

/// What a trace stands for; hover and angle read-back depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceRole {
    History,
    CurrentMarker,
    Threshold,
    TrendLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "markers+text")]
    MarkersText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Solid,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Rgba,
    pub dash: LineDash,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub color: Rgba,
}

/// One scatter trace.
///
/// Unreadable values serialize as `null`, which surfaces draw as gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub role: TraceRole,
    pub name: String,
    #[serde(with = "nan_as_null")]
    pub x: Vec<f64>,
    #[serde(with = "nan_as_null")]
    pub y: Vec<f64>,
    pub mode: TraceMode,
    /// Per-point hover text, or the single label drawn next to a marker.
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default)]
    pub text_position: Option<String>,
    pub line: LineStyle,
    pub marker: MarkerStyle,
    /// Surfaces must not report hover events for this trace.
    #[serde(default)]
    pub hover_skip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub scale: AxisScale,
    /// Range in axis units; on log axes this is in `log10` space.
    pub range: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    TrendLine,
    Threshold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub x_shift: f64,
    pub y_shift: f64,
    /// Rotation in degrees.
    pub text_angle: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub annotations: Vec<Annotation>,
    pub show_legend: bool,
    pub hover_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageExport {
    pub format: String,
    pub filename: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub responsive: bool,
    pub image_export: ImageExport,
}

/// Declarative chart handed to a `ChartSurface`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescription {
    pub traces: Vec<Trace>,
    pub layout: Layout,
    pub config: SurfaceConfig,
}

impl ChartDescription {
    /// Indices of every trace whose `name` matches `name`.
    #[must_use]
    pub fn trace_indices_named(&self, name: &str) -> Vec<usize> {
        self.traces
            .iter()
            .enumerate()
            .filter(|(_, trace)| trace.name == name)
            .map(|(index, _)| index)
            .collect()
    }

    #[must_use]
    pub fn traces_with_role(&self, role: TraceRole) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(move |trace| trace.role == role)
    }

    #[must_use]
    pub fn annotation(&self, kind: AnnotationKind) -> Option<&Annotation> {
        self.layout
            .annotations
            .iter()
            .find(|annotation| annotation.kind == kind)
    }

    pub fn validate(&self) -> TrendsResult<()> {
        for (index, trace) in self.traces.iter().enumerate() {
            if trace.x.len() != trace.y.len() {
                return Err(TrendsError::InvalidData(format!(
                    "trace {index} (`{}`) has {} x values but {} y values",
                    trace.name,
                    trace.x.len(),
                    trace.y.len()
                )));
            }
        }
        for (axis, range) in [
            ("x", self.layout.x_axis.range),
            ("y", self.layout.y_axis.range),
        ] {
            if !range.0.is_finite() || !range.1.is_finite() {
                return Err(TrendsError::InvalidData(format!(
                    "{axis}-axis range must be finite"
                )));
            }
        }
        for annotation in self.layout.annotations.iter().filter(|a| a.visible) {
            if !annotation.x.is_finite() || !annotation.y.is_finite() {
                return Err(TrendsError::InvalidData(format!(
                    "visible {:?} annotation must have a finite position",
                    annotation.kind
                )));
            }
        }
        Ok(())
    }
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mapped: Vec<Option<f64>> = values
            .iter()
            .map(|value| value.is_finite().then_some(*value))
            .collect();
        mapped.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let mapped = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(mapped
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_text_round_trips() {
        assert_eq!(HIGHLIGHT_COLOR.to_string(), "rgba(254, 52, 110, 1)");
        assert_eq!(HISTORY_COLOR.to_string(), "rgba(0, 0, 0, 0.15)");
        let parsed = Rgba::try_from("rgba(0,0,0,0.15)".to_owned()).expect("parse");
        assert_eq!(parsed, HISTORY_COLOR);
        assert!(Rgba::try_from("#fff".to_owned()).is_err());
    }
}
