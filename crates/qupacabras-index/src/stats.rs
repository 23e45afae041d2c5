//! Consistency checks for `{min, median, mean, max}` summaries.

use crate::record::StatSummary;
use crate::validation::ValidationResult;

/// Error rates above this are flagged when `flag_high` is set.
const HIGH_ERROR_RATE: f64 = 0.5;

/// Check ordering and range invariants of one summary.
///
/// Everything is a warning except `min > max`, which is a hard error.
/// `flag_high` adds the error-rate plausibility check; timing fields leave
/// it off.
pub fn check_stat_summary(
    stats: &StatSummary,
    field: &str,
    flag_high: bool,
    result: &mut ValidationResult,
) {
    if stats.min > stats.median {
        result.warn(field, "Minimum value should not exceed median value");
    }
    if stats.median > stats.max {
        result.warn(field, "Median value should not exceed maximum value");
    }
    if stats.min > stats.max {
        result.error(field, "Minimum value cannot exceed maximum value");
    }
    if stats.mean < stats.min || stats.mean > stats.max {
        result.warn(
            field,
            "Mean value should be between minimum and maximum values",
        );
    }
    if flag_high && stats.max > HIGH_ERROR_RATE {
        result.warn(field, "Error rate above 50% seems unusually high");
    }
}
