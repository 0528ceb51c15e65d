//! Calendar helpers: hours of year and analysis periods.
//!
//! Hours are 1-based (`1` = Jan 1, 00:00-01:00; `8760` = Dec 31, 23:00-24:00)
//! and dates are `(month, day, hour)` with `hour` in `1..=24`. Calendar math
//! runs on a fixed non-leap year.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};
use cm_core::HOURS_PER_YEAR;

/// Non-leap reference year for calendar arithmetic.
const REFERENCE_YEAR: i32 = 2017;

/// Date of a 1-based hour of year.
pub fn hour_to_date(hoy: usize) -> SeriesResult<DateTuple> {
    DateTuple::from_hoy(hoy)
}

/// A `(month, day, hour)` triple as written in series headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTuple {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl DateTuple {
    pub fn new(month: u32, day: u32, hour: u32) -> SeriesResult<Self> {
        let date = Self { month, day, hour };
        date.day_of_year()?;
        Ok(date)
    }

    /// 1-based day of year.
    pub fn day_of_year(&self) -> SeriesResult<u32> {
        if !(1..=24).contains(&self.hour) {
            return Err(self.invalid());
        }
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, self.month, self.day)
            .map(|d| d.ordinal())
            .ok_or_else(|| self.invalid())
    }

    /// 1-based hour of year.
    pub fn hoy(&self) -> SeriesResult<usize> {
        let doy = self.day_of_year()?;
        Ok(((doy - 1) * 24 + self.hour) as usize)
    }

    /// Inverse of [`DateTuple::hoy`].
    pub fn from_hoy(hoy: usize) -> SeriesResult<Self> {
        if hoy == 0 || hoy > HOURS_PER_YEAR {
            return Err(SeriesError::InvalidHour { hoy });
        }
        let doy = ((hoy - 1) / 24 + 1) as u32;
        let hour = ((hoy - 1) % 24 + 1) as u32;
        let date = NaiveDate::from_yo_opt(REFERENCE_YEAR, doy)
            .ok_or(SeriesError::InvalidHour { hoy })?;
        Ok(Self {
            month: date.month(),
            day: date.day(),
            hour,
        })
    }

    fn invalid(&self) -> SeriesError {
        SeriesError::InvalidDate {
            month: self.month,
            day: self.day,
            hour: self.hour,
        }
    }
}

impl fmt::Display for DateTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.month, self.day, self.hour)
    }
}

impl FromStr for DateTuple {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || SeriesError::Parse {
            field: "date tuple",
            value: s.to_string(),
        };
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<u32> = inner
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| parse_err())?;
        match parts.as_slice() {
            [m, d, h] => DateTuple::new(*m, *d, *h),
            _ => Err(parse_err()),
        }
    }
}

/// Inclusive analysis period. Like the engines' run periods this is a
/// "box": every day from `start` to `end` (wrapping over the year end),
/// restricted to the hours `start.hour..=end.hour` of each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    pub start: DateTuple,
    pub end: DateTuple,
}

impl Default for AnalysisPeriod {
    fn default() -> Self {
        Self::whole_year()
    }
}

impl AnalysisPeriod {
    pub fn new(start: DateTuple, end: DateTuple) -> Self {
        Self { start, end }
    }

    pub fn whole_year() -> Self {
        Self {
            start: DateTuple {
                month: 1,
                day: 1,
                hour: 1,
            },
            end: DateTuple {
                month: 12,
                day: 31,
                hour: 24,
            },
        }
    }

    /// A single-hour period.
    pub fn single_hour(hoy: usize) -> SeriesResult<Self> {
        let date = DateTuple::from_hoy(hoy)?;
        Ok(Self {
            start: date,
            end: date,
        })
    }

    pub fn is_whole_year(&self) -> bool {
        *self == Self::whole_year()
    }

    /// 1-based hours of year covered by the period, in chronological order
    /// starting at `start`.
    pub fn hoys(&self) -> SeriesResult<Vec<usize>> {
        let start_day = self.start.day_of_year()?;
        let end_day = self.end.day_of_year()?;

        let days: Vec<u32> = if start_day <= end_day {
            (start_day..=end_day).collect()
        } else {
            (start_day..=365).chain(1..=end_day).collect()
        };

        let hours: Vec<u32> = if self.start.hour <= self.end.hour {
            (self.start.hour..=self.end.hour).collect()
        } else {
            (self.start.hour..=24).chain(1..=self.end.hour).collect()
        };

        let mut out = Vec::with_capacity(days.len() * hours.len());
        for day in days {
            for hour in &hours {
                out.push(((day - 1) * 24 + hour) as usize);
            }
        }
        Ok(out)
    }

    pub fn len(&self) -> SeriesResult<usize> {
        Ok(self.hoys()?.len())
    }
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.start, self.end)
    }
}

/// Position lookup from hour of year into a series recorded over a period.
#[derive(Debug, Clone)]
pub struct PeriodIndex {
    positions: HashMap<usize, usize>,
}

impl PeriodIndex {
    pub fn new(data_period: &AnalysisPeriod) -> SeriesResult<Self> {
        let positions = data_period
            .hoys()?
            .into_iter()
            .enumerate()
            .map(|(pos, hoy)| (hoy, pos))
            .collect();
        Ok(Self { positions })
    }

    /// Sample position of `hoy` inside the data, if recorded.
    pub fn position(&self, hoy: usize) -> Option<usize> {
        self.positions.get(&hoy).copied()
    }

    /// True when both ends of `requested` fall inside the data period.
    pub fn aligns_with(&self, requested: &[usize]) -> bool {
        match (requested.first(), requested.last()) {
            (Some(first), Some(last)) => {
                self.positions.contains_key(first) && self.positions.contains_key(last)
            }
            _ => false,
        }
    }
}
