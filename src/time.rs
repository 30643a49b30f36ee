//! CF time coordinate decoding
//!
//! Time coordinates are stored as offsets from a reference date
//! (`"days since 1850-01-01"`), interpreted in a calendar named by the
//! `calendar` attribute. The climatology only needs the calendar month of
//! each time step, so decoding stops there.

use crate::errors::{ClimError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::str::FromStr;

const SECONDS_PER_DAY: f64 = 86_400.0;

const NOLEAP_MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const ALL_LEAP_MONTH_DAYS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAY360_MONTH_DAYS: [u32; 12] = [30; 12];

/// CF calendars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// `standard`, `gregorian` and `proleptic_gregorian`
    Gregorian,
    /// `noleap` / `365_day`
    NoLeap,
    /// `all_leap` / `366_day`
    AllLeap,
    /// `360_day`
    Day360,
    /// `julian`
    Julian,
}

impl FromStr for Calendar {
    type Err = ClimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(Self::Gregorian),
            "noleap" | "365_day" => Ok(Self::NoLeap),
            "all_leap" | "366_day" => Ok(Self::AllLeap),
            "360_day" => Ok(Self::Day360),
            "julian" => Ok(Self::Julian),
            other => Err(ClimError::TimeDecode(format!("unsupported calendar '{other}'"))),
        }
    }
}

impl Calendar {
    /// Month lengths for calendars with a fixed year length
    fn fixed_month_days(self) -> Option<&'static [u32; 12]> {
        match self {
            Self::NoLeap => Some(&NOLEAP_MONTH_DAYS),
            Self::AllLeap => Some(&ALL_LEAP_MONTH_DAYS),
            Self::Day360 => Some(&DAY360_MONTH_DAYS),
            Self::Gregorian | Self::Julian => None,
        }
    }
}

/// Reference date of a CF units string, calendar-agnostic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub seconds_of_day: f64,
}

/// Parsed `"<unit> since <date>"` string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    /// Length of one unit in seconds
    pub unit_seconds: f64,
    pub reference: ReferenceDate,
}

impl FromStr for TimeUnits {
    type Err = ClimError;

    fn from_str(s: &str) -> Result<Self> {
        let (unit, reference) = s
            .split_once(" since ")
            .ok_or_else(|| {
                ClimError::TimeDecode(format!("expected '<unit> since <date>', got '{s}'"))
            })?;

        let unit_seconds = match unit.trim().to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => SECONDS_PER_DAY,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600.0,
            "minutes" | "minute" | "mins" | "min" => 60.0,
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            other => {
                return Err(ClimError::TimeDecode(format!("unsupported time unit '{other}'")));
            }
        };

        Ok(Self {
            unit_seconds,
            reference: parse_reference_date(reference.trim())?,
        })
    }
}

fn parse_reference_date(s: &str) -> Result<ReferenceDate> {
    let bad = || ClimError::TimeDecode(format!("cannot parse reference date '{s}'"));

    let s = s.trim_end_matches('Z');
    let (date_part, time_part) = match s.split_once(['T', ' ']) {
        Some((d, t)) => (d, Some(t.trim())),
        None => (s, None),
    };

    // Leading '-' belongs to the year
    let (sign, date_digits) = match date_part.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, date_part),
    };
    let mut fields = date_digits.split('-');
    let year: i64 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let month: u32 = fields.next().unwrap_or("1").parse().map_err(|_| bad())?;
    let day: u32 = fields.next().unwrap_or("1").parse().map_err(|_| bad())?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(bad());
    }

    let mut seconds_of_day = 0.0;
    if let Some(time) = time_part.filter(|t| !t.is_empty()) {
        // Drop a trailing UTC offset such as "+00:00"
        let time = time.split(['+', ' ']).next().unwrap_or(time);
        for (part, scale) in time.split(':').zip([3_600.0, 60.0, 1.0]) {
            let value: f64 = part.parse().map_err(|_| bad())?;
            seconds_of_day += value * scale;
        }
    }

    Ok(ReferenceDate {
        year: sign * year,
        month,
        day,
        seconds_of_day,
    })
}

/// Decode CF time offsets into calendar months (1 = January).
///
/// `calendar` defaults to `standard` when the attribute is absent.
///
/// # Errors
///
/// Returns [`ClimError::TimeDecode`] for unsupported units or calendars,
/// unparseable reference dates, and offsets that fall outside the
/// representable date range.
pub fn decode_months(values: &[f64], units: &str, calendar: Option<&str>) -> Result<Vec<u32>> {
    let units: TimeUnits = units.parse()?;
    let calendar: Calendar = calendar.unwrap_or("standard").parse()?;

    values
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(ClimError::TimeDecode(format!("non-finite time value {offset}")));
            }
            let seconds = offset * units.unit_seconds;
            match calendar {
                Calendar::Gregorian => gregorian_month(&units.reference, seconds),
                Calendar::Julian => julian_month(&units.reference, seconds),
                fixed => fixed_calendar_month(
                    fixed.fixed_month_days().unwrap_or(&NOLEAP_MONTH_DAYS),
                    &units.reference,
                    seconds,
                ),
            }
        })
        .collect()
}

fn out_of_range(reference: &ReferenceDate, seconds: f64) -> ClimError {
    ClimError::TimeDecode(format!(
        "date {}-{:02}-{:02} + {seconds}s is out of range",
        reference.year, reference.month, reference.day
    ))
}

/// Whole days elapsed since the reference date, or `None` past the range of `i64`
fn elapsed_days(reference: &ReferenceDate, seconds: f64) -> Option<i64> {
    let days = ((reference.seconds_of_day + seconds) / SECONDS_PER_DAY).floor();
    // 2^63 itself does not fit; stay clear of the saturating cast
    (days.abs() < 9.0e18).then_some(days as i64)
}

fn gregorian_month(reference: &ReferenceDate, seconds: f64) -> Result<u32> {
    let bad = || out_of_range(reference, seconds);

    let year = i32::try_from(reference.year).map_err(|_| bad())?;
    let date = NaiveDate::from_ymd_opt(year, reference.month, reference.day).ok_or_else(bad)?;
    let epoch = NaiveDateTime::new(date, NaiveTime::MIN);

    let millis = (reference.seconds_of_day + seconds) * 1_000.0;
    if millis.abs() >= 9.0e18 {
        return Err(bad());
    }
    let delta = TimeDelta::try_milliseconds(millis.round() as i64).ok_or_else(bad)?;
    let decoded = epoch.checked_add_signed(delta).ok_or_else(bad)?;

    Ok(decoded.month())
}

fn fixed_calendar_month(
    month_days: &[u32; 12],
    reference: &ReferenceDate,
    seconds: f64,
) -> Result<u32> {
    let year_days: i64 = month_days.iter().map(|&d| i64::from(d)).sum();
    let days_before_month: i64 = month_days[..(reference.month - 1) as usize]
        .iter()
        .map(|&d| i64::from(d))
        .sum();

    let day = reference
        .year
        .checked_mul(year_days)
        .and_then(|d| d.checked_add(days_before_month + i64::from(reference.day - 1)))
        .zip(elapsed_days(reference, seconds))
        .and_then(|(epoch, elapsed)| epoch.checked_add(elapsed))
        .ok_or_else(|| out_of_range(reference, seconds))?;

    let mut remaining = day.rem_euclid(year_days);
    for (i, &len) in month_days.iter().enumerate() {
        if remaining < i64::from(len) {
            return Ok(i as u32 + 1);
        }
        remaining -= i64::from(len);
    }
    Ok(12)
}

/// Julian day number of a Julian-calendar date
fn julian_day_number(year: i64, month: u32, day: u32) -> Option<i64> {
    let a = (14 - i64::from(month)) / 12;
    let y = year.checked_add(4800 - a)?;
    let m = i64::from(month) + 12 * a - 3;
    y.checked_mul(365)?
        .checked_add(y.div_euclid(4))?
        .checked_add(i64::from(day) + (153 * m + 2) / 5 - 32083)
}

fn julian_month(reference: &ReferenceDate, seconds: f64) -> Result<u32> {
    let jdn = julian_day_number(reference.year, reference.month, reference.day)
        .zip(elapsed_days(reference, seconds))
        .and_then(|(jdn, elapsed)| jdn.checked_add(elapsed))
        .ok_or_else(|| out_of_range(reference, seconds))?;

    let c = jdn
        .checked_add(32082)
        .filter(|c| c.checked_mul(4).and_then(|v| v.checked_add(3)).is_some())
        .ok_or_else(|| out_of_range(reference, seconds))?;
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2) / 153;
    Ok((m + 3 - 12 * (m / 10)) as u32)
}
