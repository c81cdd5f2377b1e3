use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Axis range chosen by the user through zoom or pan.
///
/// An axis left `None` keeps the computed default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UserAxisRange {
    pub x: Option<(f64, f64)>,
    pub y: Option<(f64, f64)>,
}

impl UserAxisRange {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Range-change notification from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RelayoutEvent {
    /// Either axis asked to go back to automatic bounds.
    Autorange,
    /// Explicit bounds for at least one axis.
    Range(UserAxisRange),
    /// Layout changed without touching axis ranges (e.g. a resize).
    Other,
}

impl RelayoutEvent {
    /// Reads the flat field map charting surfaces emit, such as
    /// `{"xaxis.range[0]": 1.2, "xaxis.range[1]": 3.4}` or `{"yaxis.autorange": true}`.
    ///
    /// Numeric strings are accepted; `"xaxis.range": [a, b]` works as well.
    #[must_use]
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let autorange = ["xaxis.autorange", "yaxis.autorange"]
            .iter()
            .any(|key| fields.get(*key).and_then(Value::as_bool) == Some(true));
        if autorange {
            return Self::Autorange;
        }

        let range = UserAxisRange {
            x: axis_range(fields, "xaxis"),
            y: axis_range(fields, "yaxis"),
        };
        if range.x.is_some() {
            Self::Range(range)
        } else {
            Self::Other
        }
    }
}

fn axis_range(fields: &Map<String, Value>, axis: &str) -> Option<(f64, f64)> {
    let from_pair = fields
        .get(&format!("{axis}.range"))
        .and_then(Value::as_array)
        .and_then(|values| match values.as_slice() {
            [low, high] => Some((loose_number(low)?, loose_number(high)?)),
            _ => None,
        });
    from_pair.or_else(|| {
        let low = fields.get(&format!("{axis}.range[0]")).and_then(loose_number)?;
        let high = fields.get(&format!("{axis}.range[1]")).and_then(loose_number)?;
        Some((low, high))
    })
}

fn loose_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Region currently under the pointer and the traces drawn for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub region: String,
    pub trace_indices: SmallVec<[usize; 2]>,
}

/// Pointer-driven state that lives outside the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    hovered: Option<HoverTarget>,
    user_range: Option<UserAxisRange>,
}

impl InteractionState {
    #[must_use]
    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.hovered.as_ref()
    }

    /// Records a hover and returns the previous target, if any.
    pub fn begin_hover(&mut self, target: HoverTarget) -> Option<HoverTarget> {
        self.hovered.replace(target)
    }

    pub fn end_hover(&mut self) -> Option<HoverTarget> {
        self.hovered.take()
    }

    #[must_use]
    pub fn user_range(&self) -> Option<UserAxisRange> {
        self.user_range
    }

    #[must_use]
    pub fn has_user_range(&self) -> bool {
        self.user_range.is_some()
    }

    pub fn set_user_range(&mut self, range: UserAxisRange) {
        self.user_range = (!range.is_empty()).then_some(range);
    }

    /// Returns whether a user range was set.
    pub fn clear_user_range(&mut self) -> bool {
        self.user_range.take().is_some()
    }
}
