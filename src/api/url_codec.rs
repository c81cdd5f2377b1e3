//! Query-string mirror of the explorer state.
//!
//! Only values that differ from the defaults are written, so a fresh session
//! has an empty query. Parameter names are kept stable for shared links.
//!
//! Older links only carried `perMillion=true`, so a non-empty query without
//! `perMillion` means per-capita is off. The encoder writes `perMillion=true`
//! whenever anything else is written, and `perMillion=false` only when it is
//! the sole difference from the defaults.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::render::AxisScale;

use super::display_options::{DEFAULT_DOUBLING_TIME, DEFAULT_NEW_CASES_LIMIT};
use super::{DataKind, DisplayOptions};

/// Region labels that were renamed after links were already shared.
/// Pairs are `(current name, name used in links)`.
pub const LEGACY_LOCATION_RENAMES: &[(&str, &str)] = &[("China (Mainland)", "China")];

/// One-shot bulk selection requested by a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectOverride {
    All,
    None,
}

/// Everything a query string can carry. `None` means "not present".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UrlState {
    pub scale: Option<AxisScale>,
    pub data_kind: Option<DataKind>,
    pub locations: Vec<String>,
    pub show_trend_line: Option<bool>,
    pub doubling_time: Option<f64>,
    /// Present means the threshold line is enabled.
    pub new_cases_limit: Option<u32>,
    pub per_capita: Option<bool>,
    /// Present means start-at is enabled.
    pub start_at_day: Option<usize>,
    pub select: Option<SelectOverride>,
}

impl UrlState {
    /// Applies the display-related fields onto `options`.
    pub fn apply_to_options(&self, options: &mut DisplayOptions) {
        if let Some(scale) = self.scale {
            options.scale = scale;
        }
        if let Some(kind) = self.data_kind {
            options.data_kind = kind;
        }
        if let Some(show) = self.show_trend_line {
            options.show_trend_line = show;
        } else if let Some(doubling_time) = self.doubling_time {
            options.doubling_time = doubling_time;
        }
        if let Some(limit) = self.new_cases_limit {
            options.show_new_cases_limit = true;
            options.new_cases_limit = limit;
        }
        if let Some(per_capita) = self.per_capita {
            options.per_capita = per_capita;
        }
    }

    #[must_use]
    pub fn location_set(&self) -> BTreeSet<String> {
        self.locations.iter().cloned().collect()
    }
}

/// State read by the encoder.
#[derive(Debug, Clone, Copy)]
pub struct UrlEncodeInput<'a> {
    pub options: &'a DisplayOptions,
    pub enable_start_at: bool,
    pub start_at_day: usize,
    pub selected: &'a BTreeSet<String>,
    pub region_names: &'a [String],
    pub default_selection: &'a BTreeSet<String>,
}

/// Builds the query string (without the leading `?`).
#[must_use]
pub fn encode_query(input: &UrlEncodeInput<'_>) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();
    let options = input.options;

    if options.scale == AxisScale::Linear {
        params.push(("scale", "linear".to_owned()));
    }
    if options.data_kind == DataKind::Deaths {
        params.push(("data", "deaths".to_owned()));
    }
    if !options.show_trend_line {
        params.push(("trendline", "false".to_owned()));
    } else if options.doubling_time != DEFAULT_DOUBLING_TIME {
        params.push(("doublingtime", options.doubling_time.to_string()));
    }
    if options.show_new_cases_limit {
        params.push(("newCasesLimit", options.new_cases_limit.to_string()));
    }
    let per_capita_slot = params.len();
    if input.enable_start_at {
        params.push(("startAtDay", input.start_at_day.to_string()));
    }

    let valid: Vec<&String> = input
        .region_names
        .iter()
        .filter(|name| input.selected.contains(*name))
        .collect();
    if valid.is_empty() {
        params.push(("select", "none".to_owned()));
    } else if valid.len() == input.region_names.len() {
        params.push(("select", "all".to_owned()));
    } else {
        let valid_set: BTreeSet<&String> = valid.iter().copied().collect();
        let default_set: BTreeSet<&String> = input.default_selection.iter().collect();
        if valid_set != default_set {
            for name in valid {
                params.push(("location", to_link_name(name).to_owned()));
            }
        }
    }

    if options.per_capita && !params.is_empty() {
        params.insert(per_capita_slot, ("perMillion", "true".to_owned()));
    } else if !options.per_capita && params.is_empty() {
        params.push(("perMillion", "false".to_owned()));
    }

    params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Reads a query string, with or without the leading `?`.
///
/// Unknown keys and unreadable values are ignored, except where a fallback
/// is defined (`newCasesLimit` falls back to 750, `startAtDay` to 0). A
/// fractional `newCasesLimit` is truncated.
#[must_use]
pub fn decode_query(query: &str) -> UrlState {
    let pairs = query_pairs(query);
    let first = |key: &str| {
        pairs
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    };

    let mut state = UrlState {
        scale: first("scale").and_then(|value| match value.to_lowercase().as_str() {
            "log" => Some(AxisScale::Log),
            "linear" => Some(AxisScale::Linear),
            _ => None,
        }),
        data_kind: first("data").and_then(|value| match value.to_lowercase().as_str() {
            "cases" => Some(DataKind::Cases),
            "deaths" => Some(DataKind::Deaths),
            _ => None,
        }),
        locations: pairs
            .iter()
            .filter(|(key, _)| key == "location")
            .map(|(_, value)| from_link_name(value).to_owned())
            .collect(),
        ..UrlState::default()
    };

    if let Some(value) = first("trendline") {
        state.show_trend_line = Some(value == "true");
    } else if let Some(value) = first("doublingtime") {
        state.doubling_time = value.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    }
    if let Some(value) = first("newCasesLimit") {
        let limit = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 1.0 && *v <= f64::from(u32::MAX))
            .map_or(DEFAULT_NEW_CASES_LIMIT, |v| v as u32);
        state.new_cases_limit = Some(limit);
    }
    if let Some(value) = first("perMillion") {
        state.per_capita = Some(value == "true");
    } else if !pairs.is_empty() {
        state.per_capita = Some(false);
    }
    if let Some(value) = first("startAtDay") {
        let day = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map_or(0, |v| v as usize);
        state.start_at_day = Some(day);
    }
    state.select = first("select").and_then(|value| match value.to_lowercase().as_str() {
        "all" => Some(SelectOverride::All),
        "none" => Some(SelectOverride::None),
        _ => None,
    });

    trace!(?state, "decoded query");
    state
}

fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(Cow::Borrowed(text)) => text.to_owned(),
        Ok(Cow::Owned(text)) => text,
        Err(_) => spaced,
    }
}

fn to_link_name(name: &str) -> &str {
    LEGACY_LOCATION_RENAMES
        .iter()
        .find(|(current, _)| *current == name)
        .map_or(name, |(_, legacy)| legacy)
}

fn from_link_name(name: &str) -> &str {
    LEGACY_LOCATION_RENAMES
        .iter()
        .find(|(_, legacy)| *legacy == name)
        .map_or(name, |(current, _)| current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names_map_both_ways() {
        assert_eq!(to_link_name("China (Mainland)"), "China");
        assert_eq!(from_link_name("China"), "China (Mainland)");
        assert_eq!(to_link_name("Trnava"), "Trnava");
    }

    #[test]
    fn components_accept_plus_and_percent_spaces() {
        assert_eq!(decode_component("Nové+Zámky"), "Nové Zámky");
        assert_eq!(decode_component("Nov%C3%A9%20Z%C3%A1mky"), "Nové Zámky");
    }

    #[test]
    fn trendline_suppresses_doubling_time() {
        let state = decode_query("trendline=true&doublingtime=4");
        assert_eq!(state.show_trend_line, Some(true));
        assert_eq!(state.doubling_time, None);
    }

    #[test]
    fn missing_per_million_only_matters_in_non_empty_queries() {
        assert_eq!(decode_query("").per_capita, None);
        assert_eq!(decode_query("?").per_capita, None);
        assert_eq!(decode_query("select=all").per_capita, Some(false));
    }
}
