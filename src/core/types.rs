use serde::{Deserialize, Serialize};

/// Administrative depth of a region; lower ranks aggregate higher ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionLevel {
    Country,
    Province,
    MicroRegion,
    District,
}

impl RegionLevel {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Country => 1,
            Self::Province => 2,
            Self::MicroRegion => 3,
            Self::District => 4,
        }
    }

    #[must_use]
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Self::Country),
            2 => Some(Self::Province),
            3 => Some(Self::MicroRegion),
            4 => Some(Self::District),
            _ => None,
        }
    }
}

/// One named region with its daily series.
///
/// `cases` and `slope` are indexed by day offset. `NaN` marks a day whose
/// count could not be read; a missing feed entry leaves the series shorter
/// instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub level: RegionLevel,
    pub cases: Vec<f64>,
    pub population: f64,
    /// Largest readable raw count, captured before any per-capita rescaling.
    pub max_cases: f64,
    pub slope: Vec<f64>,
}

impl Region {
    /// Creates a region without any recorded days.
    #[must_use]
    pub fn shell(name: impl Into<String>, level: RegionLevel, population: f64) -> Self {
        Self {
            name: name.into(),
            level,
            cases: Vec::new(),
            population,
            max_cases: 0.0,
            slope: Vec::new(),
        }
    }

    /// Creates a region from a complete case series.
    #[must_use]
    pub fn with_cases(
        name: impl Into<String>,
        level: RegionLevel,
        population: f64,
        cases: Vec<f64>,
    ) -> Self {
        let max_cases = series_max(&cases);
        Self {
            name: name.into(),
            level,
            cases,
            population,
            max_cases,
            slope: Vec::new(),
        }
    }

    pub fn push_count(&mut self, count: f64) {
        self.cases.push(count);
        if self.max_cases < count {
            self.max_cases = count;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case value at `day`, `NaN` when the day is outside the series.
    #[must_use]
    pub fn case_at(&self, day: usize) -> f64 {
        self.cases.get(day).copied().unwrap_or(f64::NAN)
    }

    /// Slope value at `day`, `NaN` when the day is outside the series.
    #[must_use]
    pub fn slope_at(&self, day: usize) -> f64 {
        self.slope.get(day).copied().unwrap_or(f64::NAN)
    }
}

/// Maximum over the readable values of `series`, `0.0` when none are readable.
#[must_use]
pub fn series_max(series: &[f64]) -> f64 {
    series
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .fold(None, |acc: Option<f64>, value| {
            Some(acc.map_or(value, |current| current.max(value)))
        })
        .unwrap_or(0.0)
}

/// Numeric equality that treats two unreadable values as equal.
#[must_use]
pub fn same_count(left: f64, right: f64) -> bool {
    left == right || (left.is_nan() && right.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_count_ignores_unreadable_values_for_max() {
        let mut region = Region::shell("Alpha", RegionLevel::District, 100.0);
        region.push_count(3.0);
        region.push_count(f64::NAN);
        region.push_count(2.0);
        assert_eq!(region.len(), 3);
        assert_eq!(region.max_cases, 3.0);
    }

    #[test]
    fn level_rank_round_trips() {
        for rank in 1..=4 {
            let level = RegionLevel::from_rank(rank).expect("known rank");
            assert_eq!(level.rank(), rank);
        }
        assert_eq!(RegionLevel::from_rank(0), None);
        assert!(RegionLevel::Country < RegionLevel::District);
    }

    #[test]
    fn same_count_matches_nan_pairs() {
        assert!(same_count(f64::NAN, f64::NAN));
        assert!(same_count(4.0, 4.0));
        assert!(!same_count(4.0, f64::NAN));
    }
}
