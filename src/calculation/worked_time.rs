//! Worked time between a check-in and a check-out.

use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;

use super::round_two_places;

/// Elapsed time between a check-in and a check-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkedTime {
    /// Whole minutes worked.
    pub minutes: i64,
    /// `minutes / 60`, rounded to two decimal places.
    pub hours: Decimal,
    /// True when the check-out fell on the following day.
    pub crossed_midnight: bool,
}

/// Computes the time worked between two clock times on the same record.
///
/// A check-out earlier than the check-in is taken to be after midnight, so
/// 24 hours are added. Equal times give zero. The result is never negative.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::calculate_worked_time;
/// use chrono::NaiveTime;
///
/// let night = calculate_worked_time(
///     NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
/// );
/// assert_eq!(night.minutes, 510);
/// assert!(night.crossed_midnight);
/// ```
pub fn calculate_worked_time(in_time: NaiveTime, out_time: NaiveTime) -> WorkedTime {
    let elapsed = out_time - in_time;
    let crossed_midnight = elapsed < Duration::zero();
    let elapsed = if crossed_midnight {
        elapsed + Duration::hours(24)
    } else {
        elapsed
    };

    let minutes = elapsed.num_minutes();
    WorkedTime {
        minutes,
        hours: round_two_places(Decimal::from(minutes) / Decimal::from(60)),
        crossed_midnight,
    }
}
