use crate::error::{TrendsError, TrendsResult};

use super::DisplayOptions;

pub(super) fn validate_display_options(options: &DisplayOptions) -> TrendsResult<()> {
    validate_doubling_time(options.doubling_time)?;
    validate_new_cases_limit(options.new_cases_limit)
}

/// Non-positive values are accepted and hide the trend line.
pub(super) fn validate_doubling_time(doubling_time: f64) -> TrendsResult<()> {
    if !doubling_time.is_finite() {
        return Err(TrendsError::InvalidData(
            "doubling time must be finite".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_new_cases_limit(limit: u32) -> TrendsResult<()> {
    if limit == 0 {
        return Err(TrendsError::InvalidData(
            "new cases limit must be > 0".to_owned(),
        ));
    }
    Ok(())
}
