//! Three-point (PERT) duration estimation.
//!
//! Converts an optimistic/most-likely/pessimistic estimate into a
//! single expected duration in whole hours.
//!
//! # Reference
//! Malcolm et al. (1959), "Application of a Technique for Research and
//! Development Program Evaluation" (the original PERT paper)

/// Expected duration from a three-point estimate, in whole hours.
///
/// Computes the classic PERT weighted average `(o + 4m + p) / 6`,
/// rounded up so that fractional hours never collapse a non-trivial
/// estimate to zero duration.
///
/// Ordering `o <= m <= p` is not enforced; the estimate is a weighted
/// mean either way.
///
/// # Example
/// ```
/// use cpm_schedule::estimate_duration;
///
/// assert_eq!(estimate_duration(2.0, 4.0, 8.0), 5); // 26/6 -> 4.33 -> 5
/// assert_eq!(estimate_duration(6.0, 6.0, 6.0), 6);
/// ```
pub fn estimate_duration(optimistic: f64, likely: f64, pessimistic: f64) -> i64 {
    ((optimistic + 4.0 * likely + pessimistic) / 6.0).ceil() as i64
}
