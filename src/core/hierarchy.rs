use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::{Region, RegionLevel};
use crate::error::{TrendsError, TrendsResult};

/// Aggregate region built by summing already-materialized regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticRegionDef {
    pub level: RegionLevel,
    pub name: String,
    pub constituents: Vec<String>,
}

impl SyntheticRegionDef {
    #[must_use]
    pub fn new<I, S>(level: RegionLevel, name: impl Into<String>, constituents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            level,
            name: name.into(),
            constituents: constituents.into_iter().map(Into::into).collect(),
        }
    }
}

/// Definition that could not be built.
///
/// `missing` lists absent constituents and `duplicates` those listed more
/// than once; both are empty when the name itself was already taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRegion {
    pub name: String,
    pub missing: Vec<String>,
    #[serde(default)]
    pub duplicates: Vec<String>,
}

/// Outcome of one hierarchy pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyReport {
    pub built: Vec<String>,
    pub skipped: Vec<SkippedRegion>,
}

impl HierarchyReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Appends synthetic regions to `base` following `definitions` in order.
///
/// A definition may only reference regions that exist before it runs, either
/// base districts or earlier definitions. When any constituent is missing the
/// definition is skipped and reported; nothing partial is inserted. A
/// constituent listed twice also skips the definition, since it would be
/// counted twice.
#[must_use]
pub fn build_hierarchy(
    base: Vec<Region>,
    definitions: &[SyntheticRegionDef],
) -> (Vec<Region>, HierarchyReport) {
    let mut working: IndexMap<String, Region> = base
        .into_iter()
        .map(|region| (region.name.clone(), region))
        .collect();
    let mut report = HierarchyReport::default();

    for definition in definitions {
        let missing: Vec<String> = definition
            .constituents
            .iter()
            .filter(|name| !working.contains_key(name.as_str()))
            .cloned()
            .collect();
        let mut seen = HashSet::with_capacity(definition.constituents.len());
        let mut duplicates: Vec<String> = Vec::new();
        for name in &definition.constituents {
            if !seen.insert(name.as_str()) && !duplicates.contains(name) {
                duplicates.push(name.clone());
            }
        }
        if !missing.is_empty() || !duplicates.is_empty() || working.contains_key(&definition.name)
        {
            warn!(
                region = %definition.name,
                missing = ?missing,
                duplicates = ?duplicates,
                "skipping synthetic region"
            );
            report.skipped.push(SkippedRegion {
                name: definition.name.clone(),
                missing,
                duplicates,
            });
            continue;
        }

        let parts: Vec<&Region> = definition
            .constituents
            .iter()
            .filter_map(|name| working.get(name.as_str()))
            .collect();
        let region = sum_regions(&definition.name, definition.level, &parts);
        debug!(
            region = %region.name,
            level = region.level.rank(),
            days = region.len(),
            "built synthetic region"
        );
        report.built.push(region.name.clone());
        working.insert(region.name.clone(), region);
    }

    (working.into_values().collect(), report)
}

/// Element-wise sum over `parts`, truncated to the shortest series.
#[must_use]
pub fn sum_regions(name: &str, level: RegionLevel, parts: &[&Region]) -> Region {
    let len = parts.iter().map(|part| part.len()).min().unwrap_or(0);
    let cases: Vec<f64> = (0..len)
        .map(|day| parts.iter().map(|part| part.cases[day]).sum())
        .collect();
    let population = parts.iter().map(|part| part.population).sum();
    Region::with_cases(name, level, population, cases)
}

pub fn definitions_from_json_str(input: &str) -> TrendsResult<Vec<SyntheticRegionDef>> {
    serde_json::from_str(input).map_err(|e| {
        TrendsError::InvalidData(format!("failed to parse synthetic region definitions: {e}"))
    })
}

pub fn definitions_to_json_pretty(definitions: &[SyntheticRegionDef]) -> TrendsResult<String> {
    serde_json::to_string_pretty(definitions).map_err(|e| {
        TrendsError::InvalidData(format!(
            "failed to serialize synthetic region definitions: {e}"
        ))
    })
}

const SLOVAK_HIERARCHY: &[(RegionLevel, &str, &[&str])] = &[
    (RegionLevel::MicroRegion, "Orava (región)", &["Dolný Kubín", "Námestovo", "Tvrdošín"]),
    (RegionLevel::MicroRegion, "Kysuce (región)", &["Čadca", "Kysucké Nové Mesto"]),
    (
        RegionLevel::MicroRegion,
        "Horná Nitra (región)",
        &["Bánovce nad Bebravou", "Partizánske", "Prievidza", "Topoľčany"],
    ),
    (RegionLevel::MicroRegion, "Záhorie (región)", &["Malacky", "Senica", "Skalica"]),
    (
        RegionLevel::MicroRegion,
        "Gemer-Malohont (región)",
        &["Rimavská Sobota", "Revúca", "Rožňava"],
    ),
    (RegionLevel::MicroRegion, "Horehronie (región)", &["Banská Bystrica", "Brezno"]),
    (RegionLevel::MicroRegion, "Podpoľanie (región)", &["Detva", "Krupina", "Zvolen"]),
    (
        RegionLevel::MicroRegion,
        "Spiš (región)",
        &[
            "Kežmarok",
            "Spišská Nová Ves",
            "Gelnica",
            "Košice - okolie",
            "Levoča",
            "Stará Ľubovňa",
            "Poprad",
        ],
    ),
    (RegionLevel::MicroRegion, "Turiec (región)", &["Martin", "Turčianske Teplice"]),
    (RegionLevel::MicroRegion, "Liptov (región)", &["Ružomberok", "Liptovský Mikuláš"]),
    (
        RegionLevel::MicroRegion,
        "Šariš (región)",
        &["Bardejov", "Prešov", "Sabinov", "Stropkov", "Svidník"],
    ),
    (
        RegionLevel::MicroRegion,
        "Dolný Zemplín (región)",
        &["Michalovce", "Sobrance", "Trebišov"],
    ),
    (
        RegionLevel::MicroRegion,
        "Horný Zemplín (región)",
        &["Humenné", "Medzilaborce", "Snina", "Vranov nad Topľou", "Stropkov"],
    ),
    (
        RegionLevel::Province,
        "Bratislavský kraj",
        &["Bratislava", "Malacky", "Pezinok", "Senec"],
    ),
    (
        RegionLevel::Province,
        "Trnavský kraj",
        &["Dunajská Streda", "Galanta", "Hlohovec", "Piešťany", "Senica", "Skalica", "Trnava"],
    ),
    (
        RegionLevel::Province,
        "Trenčiansky kraj",
        &[
            "Bánovce nad Bebravou",
            "Ilava",
            "Myjava",
            "Nové Mesto nad Váhom",
            "Partizánske",
            "Považská Bystrica",
            "Prievidza",
            "Púchov",
            "Trenčín",
        ],
    ),
    (
        RegionLevel::Province,
        "Nitriansky kraj",
        &["Komárno", "Levice", "Nitra", "Nové Zámky", "Šaľa", "Topoľčany", "Zlaté Moravce"],
    ),
    (
        RegionLevel::Province,
        "Žilinský kraj",
        &[
            "Bytča",
            "Čadca",
            "Dolný Kubín",
            "Kysucké Nové Mesto",
            "Liptovský Mikuláš",
            "Martin",
            "Námestovo",
            "Ružomberok",
            "Turčianske Teplice",
            "Tvrdošín",
            "Žilina",
        ],
    ),
    (
        RegionLevel::Province,
        "Banskobystrický kraj",
        &[
            "Banská Bystrica",
            "Banská Štiavnica",
            "Brezno",
            "Detva",
            "Krupina",
            "Lučenec",
            "Poltár",
            "Revúca",
            "Rimavská Sobota",
            "Veľký Krtíš",
            "Zvolen",
            "Žarnovica",
            "Žiar nad Hronom",
        ],
    ),
    (
        RegionLevel::Province,
        "Prešovský kraj",
        &[
            "Bardejov",
            "Humenné",
            "Kežmarok",
            "Levoča",
            "Medzilaborce",
            "Poprad",
            "Prešov",
            "Sabinov",
            "Snina",
            "Stará Ľubovňa",
            "Stropkov",
            "Svidník",
            "Vranov nad Topľou",
        ],
    ),
    (
        RegionLevel::Province,
        "Košický kraj",
        &[
            "Gelnica",
            "Košice",
            "Košice - okolie",
            "Michalovce",
            "Rožňava",
            "Sobrance",
            "Spišská Nová Ves",
            "Trebišov",
        ],
    ),
    (
        RegionLevel::Country,
        "Slovenská Republika",
        &[
            "Banskobystrický kraj",
            "Bratislavský kraj",
            "Košický kraj",
            "Nitriansky kraj",
            "Prešovský kraj",
            "Trenčiansky kraj",
            "Trnavský kraj",
            "Žilinský kraj",
        ],
    ),
];

/// Micro-region, province and country aggregates over Slovak districts.
///
/// Micro-regions are cultural groupings and may overlap (Stropkov belongs to
/// both Šariš and Horný Zemplín).
#[must_use]
pub fn slovak_region_hierarchy() -> Vec<SyntheticRegionDef> {
    SLOVAK_HIERARCHY
        .iter()
        .map(|(level, name, constituents)| {
            SyntheticRegionDef::new(*level, *name, constituents.iter().copied())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_hierarchy_is_in_dependency_order() {
        let definitions = slovak_region_hierarchy();
        assert_eq!(definitions.len(), 22);
        let country = definitions.last().expect("country definition");
        assert_eq!(country.level, RegionLevel::Country);
        for constituent in &country.constituents {
            assert!(
                definitions
                    .iter()
                    .any(|d| d.level == RegionLevel::Province && &d.name == constituent)
            );
        }
    }

    #[test]
    fn definitions_json_round_trip() {
        let definitions = slovak_region_hierarchy();
        let json = definitions_to_json_pretty(&definitions).expect("serialize");
        let parsed = definitions_from_json_str(&json).expect("parse");
        assert_eq!(parsed, definitions);
    }
}
