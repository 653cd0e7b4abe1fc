//! Projection of a computed schedule onto calendar dates.
//!
//! One time unit is one working day. Time unit `t` of the schedule is the
//! `t`-th working day counted from the project start (the start itself is
//! moved forward to the first working day).

use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

use crate::config::CalendarConfig;
use crate::models::Schedule;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Activity {0:?} is missing computed times")]
    Incomplete(String),
    #[error("Time offset {0} cannot be placed on the calendar")]
    OutOfRange(i64),
}

/// Calendar dates of one activity. Finish dates are the last day worked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEntry {
    pub id: String,
    pub earliest_start: NaiveDate,
    pub earliest_finish: NaiveDate,
    pub latest_start: NaiveDate,
    pub latest_finish: NaiveDate,
    pub is_critical: bool,
}

/// The `offset`-th working day on or after `start`.
pub fn working_day(
    start: NaiveDate,
    offset: i64,
    config: &CalendarConfig,
) -> Result<NaiveDate, CalendarError> {
    if offset < 0 {
        return Err(CalendarError::OutOfRange(offset));
    }
    let next = |d: NaiveDate| {
        d.checked_add_days(Days::new(1))
            .ok_or(CalendarError::OutOfRange(offset))
    };

    let mut day = start;
    while !config.is_working_day(day.weekday()) {
        day = next(day)?;
    }
    let mut remaining = offset;
    while remaining > 0 {
        day = next(day)?;
        if config.is_working_day(day.weekday()) {
            remaining -= 1;
        }
    }
    Ok(day)
}

/// Last day worked for an interval `[begin, end)`; the begin day for empty
/// intervals.
fn finish_day(
    start: NaiveDate,
    begin: i64,
    end: i64,
    config: &CalendarConfig,
) -> Result<NaiveDate, CalendarError> {
    working_day(start, end.saturating_sub(1).max(begin), config)
}

/// Dates for every activity of `schedule`, in input order.
pub fn project_calendar(
    schedule: &Schedule,
    start: NaiveDate,
    config: &CalendarConfig,
) -> Result<Vec<CalendarEntry>, CalendarError> {
    schedule
        .activities
        .iter()
        .map(|activity| {
            let t = activity
                .timing()
                .ok_or_else(|| CalendarError::Incomplete(activity.id.clone()))?;
            Ok(CalendarEntry {
                id: activity.id.clone(),
                earliest_start: working_day(start, t.faz, config)?,
                earliest_finish: finish_day(start, t.faz, t.fez, config)?,
                latest_start: working_day(start, t.saz, config)?,
                latest_finish: finish_day(start, t.saz, t.sez, config)?,
                is_critical: t.is_critical(),
            })
        })
        .collect()
}

/// Last working day of the whole project.
pub fn project_end_date(
    schedule: &Schedule,
    start: NaiveDate,
    config: &CalendarConfig,
) -> Result<NaiveDate, CalendarError> {
    finish_day(start, 0, schedule.project_duration, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity;
    use crate::schedule::calculate_schedule;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_working_day_skips_weekends() {
        let config = CalendarConfig::default();
        // 2025-01-03 is a Friday
        let friday = date(2025, 1, 3);
        assert_eq!(working_day(friday, 0, &config).unwrap(), friday);
        assert_eq!(working_day(friday, 1, &config).unwrap(), date(2025, 1, 6));
        assert_eq!(working_day(friday, 5, &config).unwrap(), date(2025, 1, 10));
    }

    #[test]
    fn test_start_on_weekend_moves_to_monday() {
        let config = CalendarConfig::default();
        let saturday = date(2025, 1, 4);
        assert_eq!(working_day(saturday, 0, &config).unwrap(), date(2025, 1, 6));
    }

    #[test]
    fn test_every_day_calendar() {
        let config = CalendarConfig {
            skip_weekends: false,
        };
        let saturday = date(2025, 1, 4);
        assert_eq!(working_day(saturday, 2, &config).unwrap(), date(2025, 1, 6));
    }

    #[test]
    fn test_negative_offset_is_rejected() {
        let config = CalendarConfig::default();
        assert_eq!(
            working_day(date(2025, 1, 6), -1, &config),
            Err(CalendarError::OutOfRange(-1))
        );
    }

    #[test]
    fn test_project_calendar() {
        let schedule = calculate_schedule(&[
            activity("A", "a", 2, &[]),
            activity("B", "b", 5, &[]),
            activity("C", "c", 3, &["A", "B"]),
        ])
        .unwrap();
        let config = CalendarConfig::default();
        // Monday
        let start = date(2025, 1, 6);
        let entries = project_calendar(&schedule, start, &config).unwrap();

        let a = &entries[0];
        assert_eq!(a.earliest_start, date(2025, 1, 6));
        assert_eq!(a.earliest_finish, date(2025, 1, 7));
        // saz = 3, sez = 5
        assert_eq!(a.latest_start, date(2025, 1, 9));
        assert_eq!(a.latest_finish, date(2025, 1, 10));
        assert!(!a.is_critical);

        let c = &entries[2];
        // faz = 5 lands on the following Monday
        assert_eq!(c.earliest_start, date(2025, 1, 13));
        assert_eq!(c.earliest_finish, date(2025, 1, 15));
        assert!(c.is_critical);

        assert_eq!(
            project_end_date(&schedule, start, &config).unwrap(),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn test_zero_duration_finishes_on_start_day() {
        let schedule = calculate_schedule(&[
            activity("A", "a", 1, &[]),
            activity("M", "milestone", 0, &["A"]),
        ])
        .unwrap();
        let entries =
            project_calendar(&schedule, date(2025, 1, 6), &CalendarConfig::default()).unwrap();
        assert_eq!(entries[1].earliest_start, date(2025, 1, 7));
        assert_eq!(entries[1].earliest_finish, date(2025, 1, 7));
    }
}
