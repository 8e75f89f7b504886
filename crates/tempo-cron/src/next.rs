//! Next-occurrence search over a compiled [`Schedule`].

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::error::{Result, ScheduleError};
use crate::schedule::Schedule;

/// How many calendar years forward the search runs before giving up.
///
/// Guards against schedules whose fields can never jointly align
/// (e.g. February 30th).
pub const SEARCH_HORIZON_YEARS: i32 = 5;

/// Compute the earliest UTC time strictly after `from` (rounded to whole
/// seconds; the search starts at `from + 1s`) that satisfies every field of
/// `schedule`.
///
/// Units are advanced most-significant first: year, month, day, hour,
/// minute. Whenever a unit wraps past its maximum the search restarts from
/// the top, since a carry invalidates any smaller unit already advanced. The
/// first advancement at any level snaps all finer sub-fields to their
/// minimum — a day or hour that was only reached by wraparound starts at its
/// beginning. When nothing needed advancing the seconds of `from + 1s` are
/// kept as-is.
///
/// Returns [`ScheduleError::Unsatisfiable`] when no match exists within
/// [`SEARCH_HORIZON_YEARS`].
pub fn next(schedule: &Schedule, from: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let mut t = (from.with_nanosecond(0).unwrap_or(from) + Duration::seconds(1)).naive_utc();
    let year_limit = t.year() + SEARCH_HORIZON_YEARS;
    let mut snapped = false;

    'wrap: loop {
        if t.year() > year_limit {
            return Err(horizon());
        }

        while !schedule.permits_year(t.year()) {
            snapped = true;
            t = start_of_year(t.year() + 1);
            if t.year() > year_limit {
                return Err(horizon());
            }
        }

        while !schedule.permits_month(t.month()) {
            if !snapped {
                snapped = true;
                t = midnight(with_day1(t.date()));
            }
            t = t + Months::new(1);
            if t.month() == 1 {
                continue 'wrap;
            }
        }

        while !day_matches(schedule, t.date()) {
            if !snapped {
                snapped = true;
                t = midnight(t.date());
            }
            t += Duration::days(1);
            if t.day() == 1 {
                continue 'wrap;
            }
        }

        while !schedule.permits_hour(t.hour()) {
            if !snapped {
                snapped = true;
                t = at(t.date(), t.hour(), 0);
            }
            t += Duration::hours(1);
            if t.hour() == 0 {
                continue 'wrap;
            }
        }

        while !schedule.permits_minute(t.minute()) {
            if !snapped {
                snapped = true;
                t = at(t.date(), t.hour(), t.minute());
            }
            t += Duration::minutes(1);
            if t.minute() == 0 {
                continue 'wrap;
            }
        }

        return Ok(t.and_utc());
    }
}

/// True when the candidate day satisfies both the day-of-month and the
/// day-of-week masks. Compiled masks are never empty (`*` is a full mask),
/// so both fields always participate and combine with AND. Weekday bits
/// follow the name table: sun=1 .. sat=7.
fn day_matches(schedule: &Schedule, date: NaiveDate) -> bool {
    schedule.permits_day_of_month(date.day())
        && schedule.permits_day_of_week(date.weekday().num_days_from_sunday() + 1)
}

fn horizon() -> ScheduleError {
    ScheduleError::Unsatisfiable {
        years: SEARCH_HORIZON_YEARS,
    }
}

fn start_of_year(year: i32) -> NaiveDateTime {
    midnight(NaiveDate::from_ymd_opt(year, 1, 1).expect("january 1st is a valid date"))
}

fn with_day1(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 is valid in every month")
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    at(date, 0, 0)
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0)
        .expect("in-range wall clock time")
}
