//! `tempo-cron` — six-field cron expression compiler and next-occurrence
//! calculator.
//!
//! # Overview
//!
//! [`compile`] turns a cron string into a [`Schedule`] of per-field permit
//! bitmasks; [`next`] searches forward from a point in time for the earliest
//! strictly later match. Both are pure functions over UTC times — no clock,
//! no I/O.
//!
//! # Fields
//!
//! | Position | Field         | Range                  | Names       |
//! |----------|---------------|------------------------|-------------|
//! | 1        | minute        | 0-59                   |             |
//! | 2        | hour          | 0-23                   |             |
//! | 3        | day of month  | 1-31                   |             |
//! | 4        | month         | 1-12                   | jan .. dec  |
//! | 5        | day of week   | 1-7 (1 = Sunday)       | sun .. sat  |
//! | 6        | year          | 2000-2063              |             |
//!
//! Each field accepts `*` or `?` (full range), single values, `a-b` ranges,
//! `/n` steps, and comma-separated combinations of these.

pub mod error;
pub mod next;
pub mod parse;
pub mod schedule;

pub use error::{Result, ScheduleError};
pub use next::{next, SEARCH_HORIZON_YEARS};
pub use parse::compile;
pub use schedule::{Schedule, YEAR_CEIL, YEAR_FLOOR};
