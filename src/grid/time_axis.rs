//! Calendar dates along the time dimension of a grid.

use crate::grid::error::GridError;
use chrono::{Duration, NaiveDate, NaiveDateTime};

const EPOCH_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A parsed CF-style time units string such as `"days since 1900-01-01"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    seconds_per_unit: i64,
    epoch: NaiveDateTime,
}

impl TimeUnits {
    /// Parses `"<unit> since <epoch>"`. The unit is one of days, hours,
    /// minutes or seconds (singular, plural or abbreviated). The epoch is a
    /// date with an optional time of day; a trailing `Z` or `UTC` is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use climgrid::TimeUnits;
    ///
    /// assert!(TimeUnits::parse("days since 1900-01-01").is_ok());
    /// assert!(TimeUnits::parse("hours since 1970-01-01 00:00:00").is_ok());
    /// assert!(TimeUnits::parse("fortnights since 1900-01-01").is_err());
    /// ```
    pub fn parse(units: &str) -> Result<Self, GridError> {
        let invalid = || GridError::InvalidTimeUnits(units.to_string());

        let lowered = units.trim().to_ascii_lowercase();
        let (unit, epoch) = lowered.split_once(" since ").ok_or_else(invalid)?;

        let seconds_per_unit = match unit.trim() {
            "days" | "day" | "d" => 86_400,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600,
            "minutes" | "minute" | "mins" | "min" => 60,
            "seconds" | "second" | "secs" | "sec" | "s" => 1,
            _ => return Err(invalid()),
        };

        let epoch = epoch.trim();
        let epoch = epoch
            .strip_suffix("utc")
            .or_else(|| epoch.strip_suffix('z'))
            .unwrap_or(epoch)
            .trim()
            .replace('t', "T");

        let epoch = EPOCH_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&epoch, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(&epoch, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(invalid)?;

        Ok(Self {
            seconds_per_unit,
            epoch,
        })
    }

    /// The instant `offset` units after the epoch.
    pub fn offset_to_datetime(&self, offset: f64) -> Option<NaiveDateTime> {
        let millis = offset * self.seconds_per_unit as f64 * 1000.0;
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return None;
        }
        let duration = Duration::try_milliseconds(millis.round() as i64)?;
        self.epoch.checked_add_signed(duration)
    }
}

/// One calendar date per layer along a grid's time dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAxis {
    dates: Vec<NaiveDate>,
}

impl TimeAxis {
    /// `days` consecutive dates starting on January 1st of `year`.
    ///
    /// # Examples
    ///
    /// ```
    /// use climgrid::TimeAxis;
    /// use chrono::NaiveDate;
    ///
    /// let axis = TimeAxis::daily_from_year(2016, 366).unwrap();
    /// assert_eq!(axis.dates()[365], NaiveDate::from_ymd_opt(2016, 12, 31).unwrap());
    /// ```
    pub fn daily_from_year(year: i32, days: usize) -> Result<Self, GridError> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| GridError::InvalidAxis {
            axis: "time".to_string(),
            reason: format!("year {} is out of range", year),
        })?;
        let dates = first.iter_days().take(days).collect::<Vec<_>>();
        if dates.len() != days {
            return Err(GridError::InvalidAxis {
                axis: "time".to_string(),
                reason: format!("{} days from {} overflow the calendar", days, first),
            });
        }
        Ok(Self { dates })
    }

    /// Converts raw time values using their units string.
    pub fn from_offsets(units: &str, offsets: &[f64]) -> Result<Self, GridError> {
        let parsed = TimeUnits::parse(units)?;
        let dates = offsets
            .iter()
            .map(|&offset| {
                parsed
                    .offset_to_datetime(offset)
                    .map(|datetime| datetime.date())
                    .ok_or_else(|| GridError::InvalidTimeValue {
                        units: units.to_string(),
                        offset,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { dates })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
