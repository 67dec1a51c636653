//! Calendar-year date bounds

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{AppError, AppResult};

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Half-open `[start, end)` range covering one calendar year in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub year: i32,
    pub start: DateTime<Utc>,
    /// First instant of the following year (exclusive)
    pub end: DateTime<Utc>,
}

impl YearBounds {
    pub fn for_year(year: i32) -> AppResult<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(invalid_year(&year.to_string()));
        }

        let start = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| invalid_year(&year.to_string()))?;
        let end = Utc
            .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| invalid_year(&year.to_string()))?;

        Ok(Self { year, start, end })
    }

    /// Parse a year as it arrives in a request path
    pub fn parse(raw: &str) -> AppResult<Self> {
        let year = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| invalid_year(raw))?;
        Self::for_year(year)
    }
}

fn invalid_year(raw: &str) -> AppError {
    AppError::BadRequest(format!(
        "Invalid year '{}': expected an integer between {} and {}.",
        raw, MIN_YEAR, MAX_YEAR
    ))
}
