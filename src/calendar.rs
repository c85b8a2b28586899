// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

//! Calendar arithmetic for two-digit years in the 2000-2099 range.

use crate::config::ConfigError;
use crate::digits::{DecodedTime, DigitPair};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

const CENTURY: i32 = 2000;

const MONTH_LENGTHS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// Key values per month for the weekday formula, paired with CENTURY_CORRECTION for the 2000s.
const MONTH_KEYS: [u8; 12] = [1, 4, 4, 0, 2, 5, 0, 3, 6, 1, 4, 6];
const CENTURY_CORRECTION: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalendarError {
    InvalidDate,
    YearOutOfRange,
}

pub const fn is_leap_year(year: u8) -> bool {
    year % 4 == 0
}

/// Month length, February has 29 days in every year divisible by 4.
/// Months outside 1-12 are treated as 31 days long.
pub const fn days_in_month(year: u8, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => MONTH_LENGTHS[(month - 1) as usize],
        _ => 31,
    }
}

/// Day of week for a date in 2000-2099, 1 = Monday through 7 = Sunday.
pub fn weekday(year: u8, month: u8, day: u8) -> u8 {
    let key = match month {
        1..=12 => MONTH_KEYS[usize::from(month - 1)],
        _ => 0,
    };
    // January and February of a leap year sit one day earlier, -1 mod 7
    let leap_adjust = if month <= 2 && is_leap_year(year) { 6 } else { 0 };
    let year = u16::from(year % 100);
    let sum = u16::from(day) + u16::from(key) + year + year / 4 + u16::from(CENTURY_CORRECTION) + leap_adjust;
    (sum % 7) as u8 + 1
}

/// Signed whole-hour offset applied to received time before it is written to the clock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneOffset(i8);

impl ZoneOffset {
    pub const UTC: ZoneOffset = ZoneOffset(0);
    pub const MAX_HOURS: i8 = 23;

    pub const fn new(hours: i8) -> Result<Self, ConfigError> {
        if hours > Self::MAX_HOURS || hours < -Self::MAX_HOURS {
            return Err(ConfigError::ZoneOffsetOutOfRange(hours));
        }
        Ok(Self(hours))
    }

    pub const fn hours(&self) -> i8 {
        self.0
    }
}

fn next_day(year: u8, month: u8, day: u8) -> (u8, u8, u8) {
    let day = day + 1;
    if day <= days_in_month(year, month) {
        return (year, month, day);
    }
    if month >= 12 {
        ((year + 1) % 100, 1, 1)
    } else {
        (year, month + 1, 1)
    }
}

fn previous_day(year: u8, month: u8, day: u8) -> (u8, u8, u8) {
    if day > 1 {
        return (year, month, day - 1);
    }
    let (year, month) = if month > 1 { (year, month - 1) } else { ((year + 99) % 100, 12) };
    (year, month, days_in_month(year, month))
}

/// The record layout kept by the real-time clock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockRecord {
    pub year: DigitPair,
    pub month: DigitPair,
    pub day: DigitPair,
    /// 1 = Monday through 7 = Sunday.
    pub weekday: u8,
    pub hour: DigitPair,
    pub minute: DigitPair,
    pub second: DigitPair,
}

impl ClockRecord {
    /// Builds the record to commit from received time, shifting it by `offset` with day, month and year
    /// rollover in both directions, then deriving the weekday.
    pub fn from_decoded(time: &DecodedTime, offset: ZoneOffset) -> Self {
        let mut year = time.year.value();
        let mut month = time.month.value();
        let mut day = time.day.value();
        let mut hour = i16::from(time.hour.value()) + i16::from(offset.hours());

        if hour > 23 {
            hour -= 24;
            (year, month, day) = next_day(year, month, day);
        } else if hour < 0 {
            hour += 24;
            (year, month, day) = previous_day(year, month, day);
        }

        Self {
            year: DigitPair::from_value(year),
            month: DigitPair::from_value(month),
            day: DigitPair::from_value(day),
            weekday: weekday(year, month, day),
            hour: DigitPair::from_value(hour as u8),
            minute: time.minute,
            second: time.second,
        }
    }

    pub fn to_naive_date_time(&self) -> Result<NaiveDateTime, CalendarError> {
        NaiveDate::from_ymd_opt(
            CENTURY + i32::from(self.year.value()),
            u32::from(self.month.value()),
            u32::from(self.day.value()),
        )
        .and_then(|date| {
            date.and_hms_opt(
                u32::from(self.hour.value()),
                u32::from(self.minute.value()),
                u32::from(self.second.value()),
            )
        })
        .ok_or(CalendarError::InvalidDate)
    }
}

impl TryFrom<NaiveDateTime> for ClockRecord {
    type Error = CalendarError;

    fn try_from(dt: NaiveDateTime) -> Result<Self, Self::Error> {
        let year = dt.year() - CENTURY;
        if !(0..100).contains(&year) {
            return Err(CalendarError::YearOutOfRange);
        }
        Ok(Self {
            year: DigitPair::from_value(year as u8),
            month: DigitPair::from_value(dt.month() as u8),
            day: DigitPair::from_value(dt.day() as u8),
            weekday: dt.weekday().number_from_monday() as u8,
            hour: DigitPair::from_value(dt.hour() as u8),
            minute: DigitPair::from_value(dt.minute() as u8),
            second: DigitPair::from_value(dt.second() as u8),
        })
    }
}
