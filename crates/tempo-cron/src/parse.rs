//! Cron expression compiler.
//!
//! Grammar per field: `item (',' item)*` where
//! `item := (('*'|'?') | value | value'-'value) ('/' step)?`.
//! Comma-separated items are OR-combined into one permit mask.

use crate::error::{Result, ScheduleError};
use crate::schedule::{Schedule, YEAR_CEIL, YEAR_FLOOR};

/// Bounds and name table for one cron field. `offset` shifts values down to
/// bit indices so that `max - offset <= 63` always holds.
struct FieldBound {
    name: &'static str,
    min: u32,
    max: u32,
    offset: u32,
    names: &'static [(&'static str, u32)],
}

const MINUTE: FieldBound = FieldBound {
    name: "minute",
    min: 0,
    max: 59,
    offset: 0,
    names: &[],
};

const HOUR: FieldBound = FieldBound {
    name: "hour",
    min: 0,
    max: 23,
    offset: 0,
    names: &[],
};

const DAY_OF_MONTH: FieldBound = FieldBound {
    name: "day-of-month",
    min: 1,
    max: 31,
    offset: 0,
    names: &[],
};

const MONTH: FieldBound = FieldBound {
    name: "month",
    min: 1,
    max: 12,
    offset: 0,
    names: &[
        ("jan", 1),
        ("feb", 2),
        ("mar", 3),
        ("apr", 4),
        ("may", 5),
        ("jun", 6),
        ("jul", 7),
        ("aug", 8),
        ("sep", 9),
        ("oct", 10),
        ("nov", 11),
        ("dec", 12),
    ],
};

const DAY_OF_WEEK: FieldBound = FieldBound {
    name: "day-of-week",
    min: 1,
    max: 7,
    offset: 0,
    names: &[
        ("sun", 1),
        ("mon", 2),
        ("tue", 3),
        ("wed", 4),
        ("thu", 5),
        ("fri", 6),
        ("sat", 7),
    ],
};

const YEAR: FieldBound = FieldBound {
    name: "year",
    min: YEAR_FLOOR as u32,
    max: YEAR_CEIL as u32,
    offset: YEAR_FLOOR as u32,
    names: &[],
};

/// Compile a six-field cron expression into a [`Schedule`].
///
/// ```text
/// * * * * * *
/// | | | | | |
/// | | | | | +-- year              (range: 2000-2063)
/// | | | | +---- day of the week   (range: 1-7, 1 = Sunday)
/// | | | +------ month of the year (range: 1-12)
/// | | +-------- day of the month  (range: 1-31)
/// | +---------- hour              (range: 0-23)
/// +------------ minute            (range: 0-59)
/// ```
pub fn compile(expr: &str) -> Result<Schedule> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ScheduleError::FieldCount(fields.len()));
    }

    Ok(Schedule {
        minute: field_mask(fields[0], &MINUTE)?,
        hour: field_mask(fields[1], &HOUR)?,
        day_of_month: field_mask(fields[2], &DAY_OF_MONTH)?,
        month: field_mask(fields[3], &MONTH)?,
        day_of_week: field_mask(fields[4], &DAY_OF_WEEK)?,
        year: field_mask(fields[5], &YEAR)?,
    })
}

/// OR-combine every comma-separated item of `text` into one mask.
fn field_mask(text: &str, bound: &FieldBound) -> Result<u64> {
    let mut mask = 0u64;
    for item in text.split(',') {
        mask |= item_mask(item, bound)?;
    }
    if mask == 0 {
        // Unreachable for any well-formed item (the range start is always
        // set), but an empty mask would make `next` loop to the horizon on
        // every call, so reject it here.
        return Err(ScheduleError::Malformed {
            field: bound.name,
            reason: "no permitted values".into(),
        });
    }
    Ok(mask)
}

fn item_mask(item: &str, bound: &FieldBound) -> Result<u64> {
    let mut step_parts = item.split('/');
    let range_part = step_parts.next().unwrap_or("");
    let step = match (step_parts.next(), step_parts.next()) {
        (None, _) => 1,
        (Some(s), None) => parse_value(s, bound.name, &[])?,
        (Some(_), Some(_)) => {
            return Err(ScheduleError::Malformed {
                field: bound.name,
                reason: format!("too many slashes in {item:?}"),
            })
        }
    };
    if step == 0 {
        return Err(ScheduleError::Malformed {
            field: bound.name,
            reason: format!("step must be at least 1 in {item:?}"),
        });
    }

    let (start, end) = if range_part == "*" || range_part == "?" {
        (bound.min, bound.max)
    } else {
        let mut range = range_part.split('-');
        let start_text = range.next().unwrap_or("");
        let start = parse_value(start_text, bound.name, bound.names)?;
        let end = match (range.next(), range.next()) {
            (None, _) => start,
            (Some(e), None) => parse_value(e, bound.name, bound.names)?,
            (Some(_), Some(_)) => {
                return Err(ScheduleError::Malformed {
                    field: bound.name,
                    reason: format!("too many hyphens in {item:?}"),
                })
            }
        };
        (start, end)
    };

    if start < bound.min || start > bound.max {
        return Err(ScheduleError::OutOfBounds {
            name: bound.name,
            value: start,
            min: bound.min,
            max: bound.max,
        });
    }
    if end > bound.max {
        return Err(ScheduleError::OutOfBounds {
            name: bound.name,
            value: end,
            min: bound.min,
            max: bound.max,
        });
    }
    if start > end {
        return Err(ScheduleError::InvertedRange { start, end });
    }

    Ok(bits(start - bound.offset, end - bound.offset, step))
}

/// Resolve a single token: a named value where the field has a name table,
/// otherwise a non-negative integer.
fn parse_value(token: &str, field: &'static str, names: &[(&'static str, u32)]) -> Result<u32> {
    let lower = token.to_ascii_lowercase();
    if let Some((_, value)) = names.iter().find(|(name, _)| *name == lower) {
        return Ok(*value);
    }
    token.parse::<u32>().map_err(|_| ScheduleError::Malformed {
        field,
        reason: format!("cannot parse {token:?} as a value"),
    })
}

/// Permit mask for `{lo, lo+step, lo+2*step, ...} ∩ [lo, hi]`.
///
/// `hi <= 63` is guaranteed by the field bound table, so the shifts below
/// cannot overflow.
fn bits(lo: u32, hi: u32, step: u32) -> u64 {
    if step == 1 {
        return (u64::MAX >> (63 - hi)) & (u64::MAX << lo);
    }
    let mut mask = 0u64;
    let mut i = lo;
    while i <= hi {
        mask |= 1 << i;
        i += step;
    }
    mask
}
