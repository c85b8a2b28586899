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

//! Bit layout of one long-wave time-code frame and the accumulator that collects it.

use crate::digits::{DecodedTime, DigitPair};
use strum::EnumCount;

/// Bits in a frame without a leap second.
pub const FRAME_BITS: u8 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCount)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameField {
    Start,
    Weather,
    CallBit,
    DstChange,
    Summer,
    Winter,
    LeapSecond,
    TimeStart,
    Minute,
    TenMinute,
    MinuteParity,
    Hour,
    TenHour,
    HourParity,
    Day,
    TenDay,
    Weekday,
    Month,
    TenMonth,
    Year,
    TenYear,
    DateParity,
}

struct FieldSpan {
    field: FrameField,
    first_bit: u8,
    width: u8,
}

const fn span(field: FrameField, first_bit: u8, width: u8) -> FieldSpan {
    FieldSpan { field, first_bit, width }
}

/// Ordered by bit position, entry `n` describes the field with discriminant `n`.
const FRAME_LAYOUT: [FieldSpan; FrameField::COUNT] = [
    span(FrameField::Start, 0, 1),
    span(FrameField::Weather, 1, 14),
    span(FrameField::CallBit, 15, 1),
    span(FrameField::DstChange, 16, 1),
    span(FrameField::Summer, 17, 1),
    span(FrameField::Winter, 18, 1),
    span(FrameField::LeapSecond, 19, 1),
    span(FrameField::TimeStart, 20, 1),
    span(FrameField::Minute, 21, 4),
    span(FrameField::TenMinute, 25, 3),
    span(FrameField::MinuteParity, 28, 1),
    span(FrameField::Hour, 29, 4),
    span(FrameField::TenHour, 33, 2),
    span(FrameField::HourParity, 35, 1),
    span(FrameField::Day, 36, 4),
    span(FrameField::TenDay, 40, 2),
    span(FrameField::Weekday, 42, 3),
    span(FrameField::Month, 45, 4),
    span(FrameField::TenMonth, 49, 1),
    span(FrameField::Year, 50, 4),
    span(FrameField::TenYear, 54, 4),
    span(FrameField::DateParity, 58, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    WrongLength(u8),
    StartBitSet,
    MissingTimeStart,
    DigitOutOfRange(FrameField),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Frame {
    bits_received: u8,
    fields: [u16; FrameField::COUNT],
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            bits_received: 0,
            fields: [0; FrameField::COUNT],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn bits_received(&self) -> u8 {
        self.bits_received
    }

    pub fn field(&self, field: FrameField) -> u16 {
        self.fields[field as usize]
    }

    /// Stores the next bit of the frame. Bits past the end of a normal frame are counted but not stored.
    pub fn push_bit(&mut self, bit: bool) {
        let position = self.bits_received;
        self.bits_received = self.bits_received.saturating_add(1);
        if !bit || position >= FRAME_BITS {
            return;
        }
        if let Some(span) = FRAME_LAYOUT
            .iter()
            .find(|span| position >= span.first_bit && position < span.first_bit + span.width)
        {
            self.fields[span.field as usize] |= 1 << (position - span.first_bit);
        }
    }

    fn digit(&self, field: FrameField) -> Result<u8, FrameError> {
        match self.field(field) {
            value @ 0..=9 => Ok(value as u8),
            _ => Err(FrameError::DigitOutOfRange(field)),
        }
    }

    fn digit_pair(&self, tens: FrameField, units: FrameField) -> Result<DigitPair, FrameError> {
        Ok(DigitPair::new(self.digit(tens)?, self.digit(units)?))
    }

    /// Validates the structure of a complete frame and extracts the time it carries.
    ///
    /// Parity bits are not checked.
    pub fn decoded_time(&self) -> Result<DecodedTime, FrameError> {
        if self.bits_received != FRAME_BITS {
            return Err(FrameError::WrongLength(self.bits_received));
        }
        if self.field(FrameField::Start) != 0 {
            return Err(FrameError::StartBitSet);
        }
        if self.field(FrameField::TimeStart) != 1 {
            return Err(FrameError::MissingTimeStart);
        }
        Ok(DecodedTime {
            second: DigitPair::new(0, 0),
            minute: self.digit_pair(FrameField::TenMinute, FrameField::Minute)?,
            hour: self.digit_pair(FrameField::TenHour, FrameField::Hour)?,
            day: self.digit_pair(FrameField::TenDay, FrameField::Day)?,
            month: self.digit_pair(FrameField::TenMonth, FrameField::Month)?,
            year: self.digit_pair(FrameField::TenYear, FrameField::Year)?,
        })
    }
}
