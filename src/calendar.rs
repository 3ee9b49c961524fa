//! Business-calendar date arithmetic.
//!
//! Treats Saturday and Sunday as non-working: a timestamp landing on a
//! weekend is advanced to Monday with its time-of-day preserved, and
//! duration accounting skips weekend hours entirely.
//!
//! # Weekend Jump Model
//! [`add_business_hours`] advances one hour at a time; whenever the
//! running timestamp lands on Saturday it jumps forward two days (one
//! day from Sunday). The jump is free — it does not consume any of the
//! duration budget.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

/// Durations above this are added flat, without weekend skipping.
///
/// Deliberate approximation carried over from the source system: the
/// hour-by-hour walk is bounded, and multi-month durations trade
/// weekend fidelity for a constant-time path.
pub const FLAT_ADDITION_THRESHOLD_HOURS: i64 = 5000;

/// Moves a weekend timestamp to the following Monday.
///
/// Saturday advances by two days, Sunday by one; weekdays pass through
/// unchanged. Time-of-day is preserved. The result is never a Saturday
/// or Sunday.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc, Datelike, Weekday};
/// use cpm_schedule::skip_weekend;
///
/// let sat = Utc.with_ymd_and_hms(2024, 1, 6, 14, 30, 0).unwrap();
/// assert_eq!(skip_weekend(sat).weekday(), Weekday::Mon);
/// ```
pub fn skip_weekend(date: DateTime<Utc>) -> DateTime<Utc> {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Adds `duration_hours` of working time to `start`, skipping weekends.
///
/// The start is first normalized with [`skip_weekend`]. Each counted
/// hour of advancement that lands on a weekend triggers a free jump to
/// Monday. Durations above [`FLAT_ADDITION_THRESHOLD_HOURS`] fall back
/// to flat, non-weekend-aware addition.
pub fn add_business_hours(start: DateTime<Utc>, duration_hours: i64) -> DateTime<Utc> {
    let mut current = skip_weekend(start);
    let mut remaining = duration_hours.max(0);

    if remaining > FLAT_ADDITION_THRESHOLD_HOURS {
        return current + Duration::hours(remaining);
    }

    while remaining > 0 {
        current += Duration::hours(1);

        match current.weekday() {
            Weekday::Sat => current += Duration::days(2),
            // Reachable when the hour step crosses midnight into Sunday
            // from a start that was never normalized through Saturday.
            Weekday::Sun => current += Duration::days(1),
            _ => {}
        }

        remaining -= 1;
    }

    current
}
