use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::url_codec::SelectOverride;

/// Which regions are drawn and which are listed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected: BTreeSet<String>,
    /// Search-filtered view of `region_names`.
    pub visible: Vec<String>,
    pub search_text: String,
    /// Every region of the current dataset, ordered by level then name.
    pub region_names: Vec<String>,
    /// Selection computed at the last full reload; the URL omits a selection
    /// equal to it.
    pub default_selection: BTreeSet<String>,
    /// One-shot override from the URL, consumed by the first load.
    pub pending_override: Option<SelectOverride>,
}

impl SelectionState {
    /// Selected names that exist in the current dataset, in list order.
    #[must_use]
    pub fn valid_selected(&self) -> Vec<&str> {
        self.region_names
            .iter()
            .filter(|name| self.selected.contains(*name))
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }
}

/// Case-insensitive substring filter preserving the order of `names`.
#[must_use]
pub fn filter_region_names(names: &[String], search_text: &str) -> Vec<String> {
    let needle = search_text.to_lowercase();
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Selection for a first load: URL override, then URL locations, then defaults.
#[must_use]
pub fn initial_selection(
    url_locations: &BTreeSet<String>,
    select_override: Option<SelectOverride>,
    region_names: &[String],
    default_selection: &BTreeSet<String>,
) -> BTreeSet<String> {
    match select_override {
        Some(SelectOverride::All) => region_names.iter().cloned().collect(),
        Some(SelectOverride::None) => BTreeSet::new(),
        None if !url_locations.is_empty() => url_locations.clone(),
        None => default_selection.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_keeps_everything() {
        let names = vec!["Alpha".to_owned(), "beta".to_owned()];
        assert_eq!(filter_region_names(&names, ""), names);
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let names = vec!["Žilina".to_owned(), "Trnava".to_owned()];
        assert_eq!(filter_region_names(&names, "žil"), vec!["Žilina".to_owned()]);
    }
}
