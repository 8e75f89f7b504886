use serde::{Deserialize, Serialize};

/// Earliest year representable in the year mask (bit 0).
///
/// The year field nominally spans up to 3000, but a 64-bit permit mask can
/// only cover 64 distinct years, so values are stored as an offset from this
/// floor: bit *i* means year `YEAR_FLOOR + i` is permitted.
pub const YEAR_FLOOR: i32 = 2000;

/// Latest year representable in the year mask (bit 63).
pub const YEAR_CEIL: i32 = YEAR_FLOOR + 63;

/// A compiled cron schedule: one permit bitmask per field.
///
/// Bit *i* set means value *i* is permitted for that field (the year field
/// is offset by [`YEAR_FLOOR`]). Every mask is non-empty — the compiler
/// rejects expressions that would produce an unsatisfiable field.
///
/// Immutable once compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Minutes 0-59.
    pub minute: u64,
    /// Hours 0-23.
    pub hour: u64,
    /// Days of the month 1-31.
    pub day_of_month: u64,
    /// Months 1-12 (jan=1 .. dec=12).
    pub month: u64,
    /// Days of the week 1-7 (sun=1 .. sat=7).
    pub day_of_week: u64,
    /// Years, offset-encoded from [`YEAR_FLOOR`].
    pub year: u64,
}

impl Schedule {
    pub fn permits_minute(&self, minute: u32) -> bool {
        minute < 64 && self.minute & (1 << minute) != 0
    }

    pub fn permits_hour(&self, hour: u32) -> bool {
        hour < 64 && self.hour & (1 << hour) != 0
    }

    pub fn permits_day_of_month(&self, day: u32) -> bool {
        day < 64 && self.day_of_month & (1 << day) != 0
    }

    pub fn permits_month(&self, month: u32) -> bool {
        month < 64 && self.month & (1 << month) != 0
    }

    /// `weekday` follows the name table: sun=1 .. sat=7.
    pub fn permits_day_of_week(&self, weekday: u32) -> bool {
        weekday < 64 && self.day_of_week & (1 << weekday) != 0
    }

    pub fn permits_year(&self, year: i32) -> bool {
        (YEAR_FLOOR..=YEAR_CEIL).contains(&year) && self.year & (1 << (year - YEAR_FLOOR)) != 0
    }
}
