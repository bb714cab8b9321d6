use chrono::NaiveDate;

use crate::model::status::Session;

use super::error::{WorkflowError, WorkflowResult};

/// Number of leave days consumed by an inclusive date range.
///
/// A morning/afternoon session counts as half a day, but only when the
/// request covers exactly one day; for longer spans the session tag does
/// not change the count.
pub fn leave_days(start: NaiveDate, end: NaiveDate, session: Session) -> WorkflowResult<f64> {
    if end < start {
        return Err(WorkflowError::InvalidRange);
    }

    let span = (end - start).num_days() + 1;

    if span == 1 && session != Session::FullDay {
        return Ok(0.5);
    }

    Ok(span as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn single_day_morning_counts_half() {
        let days = leave_days(d("2025-06-02"), d("2025-06-02"), Session::Morning).unwrap();
        assert_eq!(days, 0.5);
    }

    #[test]
    fn single_day_afternoon_counts_half() {
        let days = leave_days(d("2025-06-02"), d("2025-06-02"), Session::Afternoon).unwrap();
        assert_eq!(days, 0.5);
    }

    #[test]
    fn single_full_day_counts_one() {
        let days = leave_days(d("2025-06-02"), d("2025-06-02"), Session::FullDay).unwrap();
        assert_eq!(days, 1.0);
    }

    #[test]
    fn range_is_inclusive_of_both_endpoints() {
        let days = leave_days(d("2025-06-02"), d("2025-06-04"), Session::FullDay).unwrap();
        assert_eq!(days, 3.0);
    }

    #[test]
    fn half_day_session_ignored_for_multi_day_span() {
        let days = leave_days(d("2025-06-02"), d("2025-06-04"), Session::Morning).unwrap();
        assert_eq!(days, 3.0);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let result = leave_days(d("2025-06-04"), d("2025-06-02"), Session::FullDay);
        assert!(matches!(result, Err(WorkflowError::InvalidRange)));
    }
}
